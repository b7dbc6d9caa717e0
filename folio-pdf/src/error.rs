//! Error types for the `folio-pdf` crate.

use thiserror::Error;

/// Errors that can occur while reading or exporting a PDF document.
#[derive(Debug, Error)]
pub enum PdfError {
    /// Reading the document or writing an export failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a readable PDF document.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The document is encrypted and its text cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// A table extraction strategy failed.
    #[error("Table extraction error ({strategy}): {message}")]
    Table {
        /// The strategy that failed.
        strategy: String,
        /// A description of the failure.
        message: String,
    },
}

impl PdfError {
    /// Stable name of the error category, suitable for showing to a user.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "IoError",
            Self::Parse(_) => "ParseError",
            Self::Encrypted => "EncryptedError",
            Self::Table { .. } => "TableError",
        }
    }
}

impl From<lopdf::Error> for PdfError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// A convenience result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

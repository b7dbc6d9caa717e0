//! Error types for the `folio-rag` crate.

use std::fmt;

use folio_model::ModelError;
use thiserror::Error;

/// Errors that can occur while answering questions about or summarizing a document.
#[derive(Debug, Error)]
pub enum RagError {
    /// Bad caller input: empty text, `k == 0`, mismatched chunk/vector counts.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The embedding model could not be loaded or reached.
    #[error("Model load error ({model}): {message}")]
    ModelLoad {
        /// The embedding model that failed to load.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding model rejected the input or produced unusable output.
    #[error("Encoding error ({provider}): {message}")]
    Encoding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote completion call failed.
    #[error(transparent)]
    Completion(#[from] ModelError),
}

impl RagError {
    /// The category of this error, suitable for showing to a user.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::ModelLoad { .. } => ErrorKind::ModelLoad,
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::Config(_) => ErrorKind::Config,
            Self::Completion(e) => match e {
                ModelError::Authentication { .. } => ErrorKind::Authentication,
                ModelError::Network { .. } => ErrorKind::Network,
                ModelError::RateLimit { .. } => ErrorKind::RateLimit,
                ModelError::Upstream { .. } => ErrorKind::Upstream,
                ModelError::InvalidConfig(_) => ErrorKind::Config,
            },
        }
    }
}

/// Flat error taxonomy shared by both flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad caller input.
    Validation,
    /// The embedding model could not be loaded or reached.
    ModelLoad,
    /// The embedding model rejected the input.
    Encoding,
    /// The completion service refused the credential.
    Authentication,
    /// The completion service could not be reached or timed out.
    Network,
    /// The completion service throttled the request.
    RateLimit,
    /// The completion service failed or returned an unusable response.
    Upstream,
    /// Settings are missing or inconsistent.
    Config,
}

impl ErrorKind {
    /// Stable name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::ModelLoad => "ModelLoadError",
            Self::Encoding => "EncodingError",
            Self::Authentication => "AuthenticationError",
            Self::Network => "NetworkError",
            Self::RateLimit => "RateLimitError",
            Self::Upstream => "UpstreamError",
            Self::Config => "ConfigError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;

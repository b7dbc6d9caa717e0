//! # folio-pdf
//!
//! Reading PDF documents for Folio.
//!
//! - [`PdfTextExtractor`]: selectable text, page by page
//! - [`extract_tables`]: ordered table detection strategies
//! - [`export_text`] / [`export_markdown`]: write extracted text to disk
//!
//! ```rust,ignore
//! use folio_pdf::{PdfTextExtractor, default_strategies, extract_tables, join_pages};
//!
//! let pages = PdfTextExtractor::new().extract_file("report.pdf")?;
//! let text = join_pages(&pages);
//! let tables = extract_tables(&default_strategies(), &pages);
//! ```

pub mod error;
pub mod export;
pub mod tables;
pub mod text;

pub use error::{PdfError, Result};
pub use export::{export_markdown, export_text, render_markdown};
pub use tables::{
    HeuristicDetector, StructuredDetector, Table, TableExtraction, TableExtractor,
    default_strategies, extract_tables,
};
pub use text::{PageText, PdfTextExtractor, TextExtractor, join_pages};

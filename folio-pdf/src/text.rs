//! Selectable-text extraction from PDF documents.
//!
//! Only text that is already embedded in the document is read; scanned pages
//! without a text layer come back empty.

use std::path::Path;

use lopdf::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{PdfError, Result};

/// The text of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number.
    pub number: u32,
    /// Text in content-stream order.
    pub text: String,
}

/// A source of per-page document text.
pub trait TextExtractor: Send + Sync {
    /// Extract the text of every page, in page order.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>>;

    /// Extract the whole document as one string, pages separated by newlines.
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        Ok(join_pages(&self.extract_pages(bytes)?))
    }
}

/// Concatenate pages in order, making sure each ends with a newline.
pub fn join_pages(pages: &[PageText]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(&page.text);
        if !page.text.is_empty() && !page.text.ends_with('\n') {
            text.push('\n');
        }
    }
    text
}

/// A [`TextExtractor`] backed by `lopdf`.
///
/// # Example
///
/// ```rust,ignore
/// use folio_pdf::{PdfTextExtractor, TextExtractor};
///
/// let pages = PdfTextExtractor::new().extract_file("report.pdf")?;
/// println!("{} pages", pages.len());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Read `path` and extract the text of every page.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Io`] if the file cannot be read, otherwise the same
    /// errors as [`extract_pages`](TextExtractor::extract_pages).
    #[instrument(name = "folio.extract", skip_all, fields(path = %path.as_ref().display()))]
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Vec<PageText>> {
        let bytes = std::fs::read(path.as_ref())?;
        self.extract_pages(&bytes)
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>> {
        let document = Document::load_mem(bytes)?;
        let pages = read_pages(&document)?;
        info!(
            page_count = pages.len(),
            char_count = pages.iter().map(|p| p.text.chars().count()).sum::<usize>(),
            "extracted document text"
        );
        Ok(pages)
    }
}

fn read_pages(document: &Document) -> Result<Vec<PageText>> {
    if document.is_encrypted() {
        return Err(PdfError::Encrypted);
    }

    // `get_pages` is keyed by page number, so iteration is in page order.
    let mut pages = Vec::new();
    for number in document.get_pages().into_keys() {
        let text = match document.extract_text(&[number]) {
            Ok(text) => text,
            Err(e) => {
                warn!(page = number, error = %e, "page text could not be decoded");
                String::new()
            }
        };
        debug!(page = number, chars = text.chars().count(), "read page");
        pages.push(PageText { number, text });
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use lopdf::{Dictionary, Object};

    use super::*;

    #[test]
    fn encrypted_documents_are_rejected() {
        let mut document = Document::with_version("1.5");
        document.trailer.set("Encrypt", Object::Dictionary(Dictionary::new()));
        assert!(matches!(read_pages(&document), Err(PdfError::Encrypted)));
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let err = PdfTextExtractor::new().extract_pages(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn pages_are_joined_with_newlines() {
        let pages = vec![
            PageText { number: 1, text: "first".into() },
            PageText { number: 2, text: String::new() },
            PageText { number: 3, text: "third\n".into() },
        ];
        assert_eq!(join_pages(&pages), "first\nthird\n");
    }
}

//! Plain-text and Markdown export of extracted text.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::text::PageText;

/// Write `text` to `path` as UTF-8, replacing any existing file.
pub fn export_text(text: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, text)?;
    info!(path = %path.display(), bytes = text.len(), "exported text");
    Ok(())
}

/// Render pages as Markdown: a `# Page N` heading followed by the page text.
pub fn render_markdown(pages: &[PageText]) -> String {
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("# Page {}\n\n", page.number));
        let body = page.text.trim_end();
        if !body.is_empty() {
            out.push_str(body);
            out.push('\n');
        }
    }
    out
}

/// Write [`render_markdown`] output to `path`.
pub fn export_markdown(pages: &[PageText], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let markdown = render_markdown(pages);
    std::fs::write(path, &markdown)?;
    info!(path = %path.display(), page_count = pages.len(), "exported markdown");
    Ok(())
}

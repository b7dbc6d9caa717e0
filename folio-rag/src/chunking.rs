//! Splitting document text into overlapping chunks.
//!
//! [`RecursiveChunker`] cuts fixed-size character windows at the most natural
//! boundary available (paragraph, line, sentence, word) and overlaps
//! consecutive chunks by a fixed number of characters. Chunks carry byte
//! offsets, so dropping each chunk's leading overlap and concatenating the
//! rest reconstructs the input exactly.

use crate::document::Chunk;

/// A strategy for splitting text into chunks.
pub trait Chunker: Send + Sync {
    /// Split `text` into chunks in document order.
    ///
    /// Returns an empty `Vec` if `text` is empty.
    fn split(&self, text: &str) -> Vec<Chunk>;
}

/// Break points tried in priority order. A break is placed after the separator.
pub const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

/// Splits text into windows of at most `chunk_size` characters.
///
/// Each window is cut after the last separator it contains (see
/// [`SEPARATORS`]) that still leaves more than `chunk_overlap` characters in
/// the chunk. A window with no usable separator is a single unbroken run;
/// that chunk extends to the end of the word and is the only case where a
/// chunk exceeds `chunk_size`. The next chunk starts exactly `chunk_overlap`
/// characters before the previous one ended.
///
/// # Example
///
/// ```rust,ignore
/// use folio_rag::{Chunker, RecursiveChunker};
///
/// let chunker = RecursiveChunker::new(800, 100);
/// let chunks = chunker.split(&document_text);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// `chunk_size` is raised to at least 1 and `chunk_overlap` is clamped
    /// below `chunk_size`; [`RagConfig`](crate::RagConfig) rejects such
    /// values before they get here.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self { chunk_size, chunk_overlap: chunk_overlap.min(chunk_size - 1) }
    }

    /// Maximum chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between consecutive chunks in characters.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Pick the end of the chunk starting at `start` whose window ends at `window_end`.
    fn break_point(&self, text: &str, start: usize, window_end: usize) -> usize {
        let window = &text[start..window_end];
        for separator in SEPARATORS {
            if let Some(pos) = window.rfind(separator) {
                let candidate = start + pos + separator.len();
                if text[start..candidate].chars().count() > self.chunk_overlap {
                    return candidate;
                }
            }
        }
        // Unbroken run: keep the word whole.
        text[window_end..]
            .find(char::is_whitespace)
            .map_or(text.len(), |offset| window_end + offset)
    }
}

/// Byte offset `n` characters after `from`, or the end of `text`.
fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..].char_indices().nth(n).map_or(text.len(), |(offset, _)| from + offset)
}

/// Byte offset `n` characters before `to`, or the start of `text`.
fn retreat_chars(text: &str, to: usize, n: usize) -> usize {
    if n == 0 {
        return to;
    }
    text[..to].char_indices().rev().nth(n - 1).map_or(0, |(offset, _)| offset)
}

impl Chunker for RecursiveChunker {
    fn split(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let window_end = advance_chars(text, start, self.chunk_size);
            let end = if window_end == text.len() {
                text.len()
            } else {
                self.break_point(text, start, window_end)
            };

            let index = chunks.len();
            chunks.push(Chunk { index, text: text[start..end].to_string(), start, end });

            if end == text.len() {
                break;
            }
            // The chunk holds more than `chunk_overlap` characters, so this always advances.
            start = retreat_chars(text, end, self.chunk_overlap);
        }

        chunks
    }
}

//! Data types for chunks, retrieval results and answers.

use serde::{Deserialize, Serialize};

/// A contiguous slice of document text.
///
/// `start` and `end` are byte offsets into the source text, always on
/// character boundaries, with `text == source[start..end]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in document order, starting at 0.
    pub index: usize,
    /// The chunk's text.
    pub text: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// A [`Chunk`] returned by a similarity query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// 1-based position in the result list (1 is the closest match).
    pub rank: usize,
    /// Distance to the query vector (lower is more similar).
    pub distance: f32,
}

/// A cited source returned alongside an answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    /// The chunk text shown to the model.
    pub text: String,
    /// 1-based retrieval rank.
    pub rank: usize,
}

impl From<RetrievedChunk> for Source {
    fn from(retrieved: RetrievedChunk) -> Self {
        Self { text: retrieved.chunk.text, rank: retrieved.rank }
    }
}

/// The result of the question-answering flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    /// The model's answer, trimmed.
    pub answer: String,
    /// Chunks the answer was conditioned on, best match first.
    pub sources: Vec<Source>,
}

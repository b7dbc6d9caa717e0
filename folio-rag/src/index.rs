//! Immutable exact nearest-neighbour index over chunk embeddings.
//!
//! A [`VectorIndex`] is built once per request from parallel sequences of
//! chunks and vectors, queried, and dropped. There is no insertion or
//! deletion after construction and nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::document::{Chunk, RetrievedChunk};
use crate::error::{RagError, Result};

/// How distance between two vectors is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean distance.
    #[default]
    L2,
    /// `1 - cosine_similarity`; zero vectors have similarity 0.
    Cosine,
}

impl DistanceMetric {
    /// Distance between `a` and `b`. Lower is more similar.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::L2 => a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt(),
            Self::Cosine => 1.0 - cosine_similarity(a, b),
        }
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// An immutable index pairing each chunk with exactly one embedding.
///
/// Queries scan every entry (exact search) and sort stably, so chunks at equal
/// distance come back in insertion order.
///
/// # Example
///
/// ```rust,ignore
/// use folio_rag::{DistanceMetric, VectorIndex};
///
/// let index = VectorIndex::build(chunks, vectors, DistanceMetric::L2)?;
/// let top = index.query(&question_vector, 3)?;
/// ```
#[derive(Debug, Clone)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
    metric: DistanceMetric,
}

impl VectorIndex {
    /// Build an index from parallel sequences of chunks and vectors.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] if the sequences differ in length, a
    /// vector is empty, vectors differ in dimension, or a vector contains a
    /// non-finite value. Nothing is constructed on failure.
    pub fn build(
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
        metric: DistanceMetric,
    ) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(RagError::Validation(format!(
                "cannot build index from {} chunks and {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimensions = vectors.first().map_or(0, Vec::len);
        if !vectors.is_empty() && dimensions == 0 {
            return Err(RagError::Validation("embedding vectors must not be empty".to_string()));
        }
        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != dimensions {
                return Err(RagError::Validation(format!(
                    "vector {i} has dimension {}, expected {dimensions}",
                    vector.len()
                )));
            }
            if vector.iter().any(|x| !x.is_finite()) {
                return Err(RagError::Validation(format!("vector {i} contains non-finite values")));
            }
        }

        Ok(Self { chunks, vectors, dimensions, metric })
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Vector dimension, or 0 for an empty index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The distance metric used by [`query`](Self::query).
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Indexed chunks in insertion order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Return up to `k` chunks ordered by ascending distance to `vector`.
    ///
    /// Returns all chunks when the index holds fewer than `k`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] if `k == 0`, or if the query vector's
    /// dimension differs from the index or contains non-finite values.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        if k == 0 {
            return Err(RagError::Validation("k must be greater than zero".to_string()));
        }
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if vector.len() != self.dimensions {
            return Err(RagError::Validation(format!(
                "query vector has dimension {}, index has {}",
                vector.len(),
                self.dimensions
            )));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(RagError::Validation("query vector contains non-finite values".to_string()));
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, candidate)| (i, self.metric.distance(candidate, vector)))
            .collect();

        // `sort_by` is stable: equal distances keep insertion order.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(position, (i, distance))| RetrievedChunk {
                chunk: self.chunks[i].clone(),
                rank: position + 1,
                distance,
            })
            .collect())
    }
}

//! Question-to-chunks retrieval.

use std::sync::Arc;

use tracing::debug;

use crate::document::RetrievedChunk;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::index::VectorIndex;

/// Default number of chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 3;

/// Embeds a question and returns the `top_k` closest chunks of an index.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever. A `top_k` of zero is rejected by the index at query time.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self { embedder, top_k }
    }

    /// Number of chunks returned per question.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieve the chunks of `index` closest to `question`, best first.
    ///
    /// # Errors
    ///
    /// Propagates embedding errors and index validation errors unchanged.
    pub async fn retrieve(
        &self,
        index: &VectorIndex,
        question: &str,
    ) -> Result<Vec<RetrievedChunk>> {
        let embedding = self.embedder.embed(question).await?;
        let results = index.query(&embedding, self.top_k)?;
        debug!(top_k = self.top_k, result_count = results.len(), "retrieved chunks");
        Ok(results)
    }
}

//! Local sentence-transformer embeddings via `fastembed` (ONNX Runtime).
//!
//! This module is only available when the `fastembed` feature is enabled.
//! Weights are downloaded from Hugging Face on first load and cached.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Resolve a Hugging Face model id to a supported `fastembed` model and its dimension.
fn resolve(model: &str) -> Option<(EmbeddingModel, usize)> {
    match model {
        "sentence-transformers/all-MiniLM-L6-v2" | "all-MiniLM-L6-v2" => {
            Some((EmbeddingModel::AllMiniLML6V2, 384))
        }
        "BAAI/bge-small-en-v1.5" => Some((EmbeddingModel::BGESmallENV15, 384)),
        "BAAI/bge-base-en-v1.5" => Some((EmbeddingModel::BGEBaseENV15, 768)),
        _ => None,
    }
}

/// An [`EmbeddingProvider`] running a pretrained model in-process.
///
/// Inference runs on the blocking thread pool. The model is read-only after
/// loading and safe to share between concurrent requests.
pub struct FastEmbedProvider {
    model_id: String,
    model: Arc<TextEmbedding>,
    dimensions: usize,
}

impl FastEmbedProvider {
    /// Load `model_id`, downloading weights into `cache_dir` if needed.
    ///
    /// Blocks while loading; call from a blocking context.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ModelLoad`] for unknown models or when the weights
    /// cannot be fetched or initialised.
    pub fn load(model_id: &str, cache_dir: Option<PathBuf>) -> Result<Self> {
        let (model, dimensions) = resolve(model_id).ok_or_else(|| RagError::ModelLoad {
            model: model_id.to_string(),
            message: "unsupported fastembed model".into(),
        })?;

        let mut options = InitOptions::new(model).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options).map_err(|e| RagError::ModelLoad {
            model: model_id.to_string(),
            message: e.to_string(),
        })?;
        info!(model = model_id, dimensions, "loaded local embedding model");

        Ok(Self { model_id: model_id.to_string(), model: Arc::new(model), dimensions })
    }

    fn encoding_error(&self, message: impl Into<String>) -> RagError {
        RagError::Encoding {
            provider: format!("fastembed ({})", self.model_id),
            message: message.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| self.encoding_error("model returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(model = %self.model_id, batch_size = texts.len(), "embedding batch");

        let model = Arc::clone(&self.model);
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let embeddings = tokio::task::spawn_blocking(move || model.embed(owned, None))
            .await
            .map_err(|e| self.encoding_error(format!("embedding task failed: {e}")))?
            .map_err(|e| self.encoding_error(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(self.encoding_error(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

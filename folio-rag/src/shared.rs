//! Process-wide embedding model with lazy initialisation.
//!
//! Loading a sentence-embedding model is expensive, so it happens once, on
//! the first embedding request, and the loaded model is kept for the rest of
//! the process. [`SharedEmbedder`] is that resource: concurrent requests
//! share it read-only, and there is no teardown.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::hashing::{DEFAULT_DIMENSIONS, HashingEmbedder};

/// Default Hugging Face model for local sentence embeddings.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Which embedding model to load.
#[derive(Clone, PartialEq)]
pub enum EmbedderSpec {
    /// Token feature hashing; needs no weights or network.
    Hashing {
        /// Vector length.
        dimensions: usize,
    },
    /// A hosted OpenAI-compatible `/embeddings` endpoint (`openai` feature).
    OpenAI {
        /// Bearer credential.
        api_key: Option<String>,
        /// API base URL.
        base_url: String,
        /// Embedding model id.
        model: String,
        /// Requested vector length, if the model supports truncation.
        dimensions: Option<usize>,
    },
    /// A local ONNX sentence-transformer (`fastembed` feature).
    FastEmbed {
        /// Hugging Face model id.
        model: String,
        /// Where downloaded weights are cached.
        cache_dir: Option<PathBuf>,
    },
}

impl Default for EmbedderSpec {
    fn default() -> Self {
        Self::Hashing { dimensions: DEFAULT_DIMENSIONS }
    }
}

// Hand-written so the credential never reaches logs.
impl fmt::Debug for EmbedderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hashing { dimensions } => {
                f.debug_struct("Hashing").field("dimensions", dimensions).finish()
            }
            Self::OpenAI { api_key, base_url, model, dimensions } => f
                .debug_struct("OpenAI")
                .field("api_key", &api_key.as_ref().map(|_| "<redacted>"))
                .field("base_url", base_url)
                .field("model", model)
                .field("dimensions", dimensions)
                .finish(),
            Self::FastEmbed { model, cache_dir } => f
                .debug_struct("FastEmbed")
                .field("model", model)
                .field("cache_dir", cache_dir)
                .finish(),
        }
    }
}

impl EmbedderSpec {
    /// A short name for logs and errors.
    pub fn model_name(&self) -> String {
        match self {
            Self::Hashing { dimensions } => format!("hashing-{dimensions}"),
            Self::OpenAI { model, .. } | Self::FastEmbed { model, .. } => model.clone(),
        }
    }

    /// Vector length expected before the model is loaded.
    fn expected_dimensions(&self) -> usize {
        match self {
            Self::Hashing { dimensions } => (*dimensions).max(1),
            Self::OpenAI { dimensions, .. } => dimensions.unwrap_or(1536),
            Self::FastEmbed { .. } => DEFAULT_DIMENSIONS,
        }
    }

    async fn load(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        match self {
            Self::Hashing { dimensions } => Ok(Arc::new(HashingEmbedder::new(*dimensions))),
            Self::OpenAI { api_key, base_url, model, dimensions } => {
                load_openai(api_key.as_deref(), base_url, model, *dimensions)
            }
            Self::FastEmbed { model, cache_dir } => load_fastembed(model, cache_dir.clone()).await,
        }
    }
}

#[cfg(feature = "openai")]
fn load_openai(
    api_key: Option<&str>,
    base_url: &str,
    model: &str,
    dimensions: Option<usize>,
) -> Result<Arc<dyn EmbeddingProvider>> {
    let api_key = api_key.ok_or_else(|| RagError::ModelLoad {
        model: model.to_string(),
        message: "no API key configured for the embeddings endpoint".into(),
    })?;
    let mut provider = crate::openai::OpenAIEmbeddingProvider::new(api_key)?
        .with_base_url(base_url)
        .with_model(model);
    if let Some(dims) = dimensions {
        provider = provider.with_dimensions(dims);
    }
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "openai"))]
fn load_openai(
    _api_key: Option<&str>,
    _base_url: &str,
    model: &str,
    _dimensions: Option<usize>,
) -> Result<Arc<dyn EmbeddingProvider>> {
    Err(RagError::ModelLoad {
        model: model.to_string(),
        message: "folio-rag was built without the `openai` feature".into(),
    })
}

#[cfg(feature = "fastembed")]
async fn load_fastembed(
    model: &str,
    cache_dir: Option<PathBuf>,
) -> Result<Arc<dyn EmbeddingProvider>> {
    let model_id = model.to_string();
    let provider = tokio::task::spawn_blocking(move || {
        crate::local_model::FastEmbedProvider::load(&model_id, cache_dir)
    })
    .await
    .map_err(|e| RagError::ModelLoad {
        model: model.to_string(),
        message: format!("model loading task failed: {e}"),
    })??;
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "fastembed"))]
async fn load_fastembed(
    model: &str,
    _cache_dir: Option<PathBuf>,
) -> Result<Arc<dyn EmbeddingProvider>> {
    Err(RagError::ModelLoad {
        model: model.to_string(),
        message: "folio-rag was built without the `fastembed` feature".into(),
    })
}

/// An embedding model loaded on first use and held for the process lifetime.
///
/// Implements [`EmbeddingProvider`] by delegating to the loaded model. If
/// loading fails the error is returned as [`RagError::ModelLoad`] and the
/// next call tries again.
///
/// # Example
///
/// ```rust,ignore
/// use folio_rag::{EmbedderSpec, SharedEmbedder};
///
/// let embedder = SharedEmbedder::global(EmbedderSpec::default());
/// let vector = embedder.embed("hello").await?;
/// ```
pub struct SharedEmbedder {
    spec: EmbedderSpec,
    model: OnceCell<Arc<dyn EmbeddingProvider>>,
}

static GLOBAL: OnceLock<Arc<SharedEmbedder>> = OnceLock::new();

impl SharedEmbedder {
    /// Create an unloaded embedder for `spec`.
    pub fn new(spec: EmbedderSpec) -> Self {
        Self { spec, model: OnceCell::new() }
    }

    /// The process-wide embedder.
    ///
    /// The first call fixes the spec; later calls return the same instance
    /// and ignore their argument.
    pub fn global(spec: EmbedderSpec) -> Arc<SharedEmbedder> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(SharedEmbedder::new(spec))))
    }

    /// The spec this embedder loads.
    pub fn spec(&self) -> &EmbedderSpec {
        &self.spec
    }

    /// Whether the model has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Return the loaded model, loading it first if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ModelLoad`] if the model cannot be loaded.
    pub async fn model(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        self.model
            .get_or_try_init(|| async {
                let model_name = self.spec.model_name();
                info!(model = %model_name, "loading embedding model");
                self.spec.load().await.map_err(|e| {
                    error!(model = %model_name, error = %e, "embedding model failed to load");
                    match e {
                        RagError::ModelLoad { .. } => e,
                        other => {
                            RagError::ModelLoad { model: model_name, message: other.to_string() }
                        }
                    }
                })
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl EmbeddingProvider for SharedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.model().await?.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.model().await?.embed_batch(texts).await
    }

    fn dimensions(&self) -> usize {
        self.model.get().map_or_else(|| self.spec.expected_dimensions(), |m| m.dimensions())
    }
}

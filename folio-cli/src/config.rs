//! Environment configuration for the `folio` binary.

use std::str::FromStr;
use std::time::Duration;

use folio_model::OpenAICompatibleConfig;
use folio_model::openai::{DEFAULT_MODEL, TOGETHER_API_BASE};
use folio_rag::hashing::DEFAULT_DIMENSIONS;
use folio_rag::{DEFAULT_EMBEDDING_MODEL, EmbedderSpec, RagConfig, RagError};

const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

/// Which embedding backend to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Feature hashing; no model download, for tests and offline runs.
    Hashing,
    /// An OpenAI-compatible `/embeddings` endpoint.
    OpenAI,
    /// A local pretrained sentence model loaded through fastembed.
    FastEmbed,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(Self::Hashing),
            "openai" => Ok(Self::OpenAI),
            "fastembed" => Ok(Self::FastEmbed),
            other => {
                Err(format!("unknown backend {other:?}, expected hashing, openai or fastembed"))
            }
        }
    }
}

/// Everything the binary reads from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Chat-completions endpoint, key, model and timeout.
    pub completion: OpenAICompatibleConfig,
    /// Backend that turns chunks and questions into vectors.
    pub embedding_backend: EmbeddingBackend,
    /// Model the embedding backend loads; unused by [`EmbeddingBackend::Hashing`].
    pub embedding_model: String,
    /// Key for the OpenAI embedding backend.
    pub embedding_api_key: Option<String>,
    /// Base URL for the OpenAI embedding backend.
    pub embedding_base_url: String,
    /// Chunking, retrieval and sampling settings.
    pub rag: RagConfig,
    /// Total completion attempts, including the first.
    pub max_retries: u32,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, RagError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] naming the variable when a value cannot be
    /// parsed or the resulting settings are inconsistent, including a
    /// `FOLIO_EMBEDDING_MODEL` given to the hashing backend.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RagError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("TOGETHER_API_KEY").or_else(|| get("FOLIO_API_KEY"));
        let completion = OpenAICompatibleConfig {
            api_key,
            base_url: get("FOLIO_BASE_URL").unwrap_or_else(|| TOGETHER_API_BASE.to_string()),
            model: get("FOLIO_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: Duration::from_secs(parse(&get, "FOLIO_TIMEOUT_SECS", 60u64)?),
        };

        let embedding_backend =
            parse(&get, "FOLIO_EMBEDDING_BACKEND", EmbeddingBackend::FastEmbed)?;
        let embedding_model = match (embedding_backend, get("FOLIO_EMBEDDING_MODEL")) {
            (EmbeddingBackend::Hashing, Some(model)) => {
                return Err(RagError::Config(format!(
                    "FOLIO_EMBEDDING_MODEL={model:?} has no effect with the hashing backend; \
                     set FOLIO_EMBEDDING_BACKEND to fastembed or openai"
                )));
            }
            (_, Some(model)) => model,
            (EmbeddingBackend::OpenAI, None) => DEFAULT_OPENAI_EMBEDDING_MODEL.to_string(),
            (_, None) => DEFAULT_EMBEDDING_MODEL.to_string(),
        };

        let defaults = RagConfig::default();
        let rag = RagConfig::builder()
            .chunk_size(parse(&get, "FOLIO_CHUNK_SIZE", defaults.chunk_size)?)
            .chunk_overlap(parse(&get, "FOLIO_CHUNK_OVERLAP", defaults.chunk_overlap)?)
            .top_k(parse(&get, "FOLIO_TOP_K", defaults.top_k)?)
            .temperature(parse(&get, "FOLIO_TEMPERATURE", defaults.temperature)?)
            .build()?;

        let max_retries = parse(&get, "FOLIO_MAX_RETRIES", 1u32)?;
        if max_retries == 0 {
            return Err(RagError::Config("FOLIO_MAX_RETRIES must be at least 1".to_string()));
        }

        Ok(Self {
            completion,
            embedding_backend,
            embedding_model,
            embedding_api_key: get("OPENAI_API_KEY"),
            embedding_base_url: get("FOLIO_EMBEDDING_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string()),
            rag,
            max_retries,
        })
    }

    /// The embedding model to load for this configuration.
    pub fn embedder_spec(&self) -> EmbedderSpec {
        match self.embedding_backend {
            EmbeddingBackend::Hashing => EmbedderSpec::Hashing { dimensions: DEFAULT_DIMENSIONS },
            EmbeddingBackend::OpenAI => EmbedderSpec::OpenAI {
                api_key: self.embedding_api_key.clone(),
                base_url: self.embedding_base_url.clone(),
                model: self.embedding_model.clone(),
                dimensions: None,
            },
            EmbeddingBackend::FastEmbed => {
                EmbedderSpec::FastEmbed { model: self.embedding_model.clone(), cache_dir: None }
            }
        }
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T, RagError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| RagError::Config(format!("invalid value {raw:?} for {name}: {e}"))),
    }
}

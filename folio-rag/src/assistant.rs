//! Question-answering and summarization over a document's text.
//!
//! The [`DocumentAssistant`] wires the pieces together:
//!
//! - QA: chunk → embed chunks → build index → embed question → retrieve
//!   top-k → prompt → complete
//! - Summary: prompt with the full text → complete
//!
//! Every call starts from scratch; nothing is cached between questions, even
//! for the same document. The first failure ends the flow and is returned
//! with its original [`ErrorKind`](crate::ErrorKind).
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_rag::{DocumentAssistant, EmbedderSpec, RagConfig, SharedEmbedder};
//! use folio_model::OpenAICompatibleClient;
//!
//! let assistant = DocumentAssistant::builder()
//!     .config(RagConfig::default())
//!     .embedder(SharedEmbedder::global(EmbedderSpec::default()))
//!     .model(Arc::new(OpenAICompatibleClient::from_env()?))
//!     .build()?;
//!
//! let answer = assistant.answer_question(&text, "What color is the sky?").await?;
//! let summary = assistant.summarize(&text).await?;
//! ```

use std::sync::Arc;

use folio_model::CompletionModel;
use tracing::{error, info, instrument};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::{Answer, Source};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::prompt::{qa_prompt, summary_prompt};
use crate::retriever::Retriever;

/// Runs the question-answering and summarization flows.
///
/// Holds only shared, read-only collaborators, so one instance can serve
/// concurrent requests. Construct one via [`DocumentAssistant::builder()`].
pub struct DocumentAssistant {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn CompletionModel>,
    chunker: Arc<dyn Chunker>,
}

impl DocumentAssistant {
    /// Create a new [`DocumentAssistantBuilder`].
    pub fn builder() -> DocumentAssistantBuilder {
        DocumentAssistantBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Return a reference to the completion model.
    pub fn model(&self) -> &Arc<dyn CompletionModel> {
        &self.model
    }

    /// Chunk `text`, embed every chunk and build a fresh index.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] for blank text, and propagates
    /// embedding failures unchanged.
    #[instrument(name = "folio.build_index", skip_all, fields(text_len = text.len()))]
    pub async fn build_index(&self, text: &str) -> Result<VectorIndex> {
        require_text(text, "document text")?;

        // 1. Chunk the text
        let chunks = self.chunker.split(text);

        // 2. Embed every chunk
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(chunk_count = chunks.len(), error = %e, "embedding failed while indexing");
            e
        })?;
        if vectors.len() != chunks.len() {
            return Err(RagError::Encoding {
                provider: "embedder".to_string(),
                message: format!("expected {} embeddings, got {}", chunks.len(), vectors.len()),
            });
        }

        // 3. Build the index
        let chunk_count = chunks.len();
        let index = VectorIndex::build(chunks, vectors, self.config.metric)?;
        info!(chunk_count, dimensions = index.dimensions(), "built document index");
        Ok(index)
    }

    /// Answer `question` from the content of `text`.
    ///
    /// Returns the trimmed answer together with the retrieved chunks, best
    /// match first.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] for blank text or question before any
    /// embedding or remote call; embedding, index and completion errors are
    /// propagated unchanged.
    #[instrument(name = "folio.answer_question", skip_all, fields(text_len = text.len()))]
    pub async fn answer_question(&self, text: &str, question: &str) -> Result<Answer> {
        require_text(text, "document text")?;
        require_text(question, "question")?;

        let index = self.build_index(text).await?;

        let retriever = Retriever::new(Arc::clone(&self.embedder), self.config.top_k);
        let retrieved = retriever.retrieve(&index, question).await.map_err(|e| {
            error!(error = %e, "retrieval failed");
            e
        })?;

        let prompt = qa_prompt(question, &retrieved);
        let answer = self.complete(&prompt, self.config.qa_params()).await?;

        let sources: Vec<Source> = retrieved.into_iter().map(Source::from).collect();
        info!(source_count = sources.len(), answer_len = answer.len(), "answered question");
        Ok(Answer { answer, sources })
    }

    /// Summarize `text` as 6–10 bullet points.
    ///
    /// The whole text goes into a single prompt; there is no truncation, so
    /// documents larger than the model's context window fail with the
    /// provider's upstream error.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] for blank text before calling the
    /// model; completion errors are propagated unchanged.
    #[instrument(name = "folio.summarize", skip_all, fields(text_len = text.len()))]
    pub async fn summarize(&self, text: &str) -> Result<String> {
        require_text(text, "document text")?;

        let summary = self.complete(&summary_prompt(text), self.config.summary_params()).await?;
        info!(summary_len = summary.len(), "summarized document");
        Ok(summary)
    }

    #[instrument(
        name = "folio.complete",
        skip_all,
        fields(model = self.model.name(), prompt_len = prompt.len())
    )]
    async fn complete(
        &self,
        prompt: &str,
        params: folio_model::GenerationParams,
    ) -> Result<String> {
        let text = self.model.complete(prompt, &params).await.map_err(|e| {
            error!(model = self.model.name(), error = %e, "completion failed");
            RagError::from(e)
        })?;
        Ok(text.trim().to_string())
    }
}

fn require_text(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RagError::Validation(format!("{what} is empty")));
    }
    Ok(())
}

/// Builder for constructing a [`DocumentAssistant`].
///
/// `embedder` and `model` are required. `config` defaults to
/// [`RagConfig::default()`] and `chunker` to a [`RecursiveChunker`] using the
/// configured chunk size and overlap.
#[derive(Default)]
pub struct DocumentAssistantBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    model: Option<Arc<dyn CompletionModel>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl DocumentAssistantBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the completion model.
    pub fn model(mut self, model: Arc<dyn CompletionModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Override the chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`DocumentAssistant`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing or the
    /// configuration is invalid.
    pub fn build(self) -> Result<DocumentAssistant> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let model = self.model.ok_or_else(|| RagError::Config("model is required".to_string()))?;
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap))
        });

        Ok(DocumentAssistant { config, embedder, model, chunker })
    }
}

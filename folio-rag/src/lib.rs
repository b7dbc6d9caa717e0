//! # folio-rag
//!
//! Retrieval-augmented question answering and summarization over document
//! text.
//!
//! ## Overview
//!
//! This crate holds every stage between extracted text and a model answer:
//!
//! - [`Chunker`] / [`RecursiveChunker`]: split text into overlapping chunks
//!   at natural boundaries
//! - [`EmbeddingProvider`]: turn text into vectors; [`SharedEmbedder`] loads
//!   the model once per process
//! - [`VectorIndex`]: exact nearest-neighbour search over one request's chunks
//! - [`Retriever`]: embed a question and fetch the closest chunks
//! - [`DocumentAssistant`]: the QA and summarization flows
//!
//! ## Features
//!
//! - `openai` – hosted OpenAI-compatible embeddings
//! - `fastembed` – local ONNX sentence-transformer embeddings
//! - `full` – all of the above
//!
//! The hashing embedder is always available and needs no network or weights.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use folio_model::OpenAICompatibleClient;
//! use folio_rag::{DocumentAssistant, EmbedderSpec, SharedEmbedder};
//!
//! let assistant = DocumentAssistant::builder()
//!     .embedder(SharedEmbedder::global(EmbedderSpec::default()))
//!     .model(Arc::new(OpenAICompatibleClient::from_env()?))
//!     .build()?;
//!
//! let answer = assistant.answer_question(&text, "What is the warranty period?").await?;
//! for source in &answer.sources {
//!     println!("[{}] {}", source.rank, source.text);
//! }
//! ```

pub mod assistant;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod hashing;
pub mod index;
pub mod prompt;
pub mod retriever;
pub mod shared;

#[cfg(feature = "fastembed")]
pub mod local_model;
#[cfg(feature = "openai")]
pub mod openai;

pub use assistant::{DocumentAssistant, DocumentAssistantBuilder};
pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Answer, Chunk, RetrievedChunk, Source};
pub use embedding::EmbeddingProvider;
pub use error::{ErrorKind, RagError, Result};
pub use hashing::HashingEmbedder;
pub use index::{DistanceMetric, VectorIndex};
pub use retriever::Retriever;
pub use shared::{DEFAULT_EMBEDDING_MODEL, EmbedderSpec, SharedEmbedder};

#[cfg(feature = "fastembed")]
pub use local_model::FastEmbedProvider;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;

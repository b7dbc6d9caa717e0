//! # folio-model
//!
//! Hosted chat-completion clients used by Folio's summarization and
//! question-answering flows.
//!
//! ## Overview
//!
//! - [`CompletionModel`] - the one-operation model interface
//! - [`OpenAICompatibleClient`] - any `/chat/completions` endpoint (Together.ai by default)
//! - [`RetryingModel`] - optional retry-with-backoff wrapper for transient failures
//! - [`MockModel`] - scripted model for tests
//!
//! ## Errors
//!
//! | Error | Cause |
//! |-------|-------|
//! | [`ModelError::Authentication`] | missing credential (no request is sent), HTTP 401/403 |
//! | [`ModelError::Network`] | connect/TLS failure, timeout |
//! | [`ModelError::RateLimit`] | HTTP 429 |
//! | [`ModelError::Upstream`] | any other non-2xx, unusable response body |

pub mod completion;
pub mod error;
pub mod mock;
pub mod openai;
pub mod retry;

pub use completion::{CompletionModel, GenerationParams};
pub use error::{ModelError, Result};
pub use mock::MockModel;
pub use openai::{OpenAICompatibleClient, OpenAICompatibleConfig};
pub use retry::{RetryPolicy, RetryingModel};

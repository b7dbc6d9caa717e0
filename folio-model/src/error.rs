//! Error types for the `folio-model` crate.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by a [`CompletionModel`](crate::CompletionModel).
#[derive(Debug, Error)]
pub enum ModelError {
    /// No credential is configured, or the provider rejected it.
    #[error("Authentication error ({provider}): {message}")]
    Authentication {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("Network error ({provider}): {message}")]
    Network {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The provider throttled the request.
    #[error("Rate limited ({provider}): {message}")]
    RateLimit {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
        /// Delay suggested by the provider's `retry-after` header, if any.
        retry_after: Option<Duration>,
    },

    /// Any other non-success response, including prompt-too-long rejections.
    #[error("Upstream error ({provider}, status {status}): {message}")]
    Upstream {
        /// The provider that produced the error.
        provider: String,
        /// HTTP status code, or 200 when a success body was unusable.
        status: u16,
        /// A description of the failure.
        message: String,
    },

    /// The client configuration is unusable.
    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),
}

impl ModelError {
    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimit { .. })
    }
}

/// A convenience result type for completion operations.
pub type Result<T> = std::result::Result<T, ModelError>;

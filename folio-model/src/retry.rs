//! Retry-with-backoff wrapper for completion models.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::completion::{CompletionModel, GenerationParams};
use crate::error::{ModelError, Result};

/// How many times and how patiently to retry transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_backoff: Duration,
    /// Upper bound for the computed exponential delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self { max_attempts: 1, ..Self::default() }
    }

    /// Delay before attempt number `attempt + 1`, where `attempt` starts at 1.
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Wraps a [`CompletionModel`] and retries rate-limit and network failures.
///
/// Authentication and other upstream errors are returned immediately. A
/// `retry-after` hint from the provider replaces the computed backoff.
///
/// # Example
///
/// ```rust,ignore
/// use folio_model::{RetryPolicy, RetryingModel};
///
/// let model = RetryingModel::new(client, RetryPolicy::default());
/// ```
pub struct RetryingModel<M> {
    inner: M,
    policy: RetryPolicy,
}

impl<M: CompletionModel> RetryingModel<M> {
    /// Wrap `inner` with the given policy.
    pub fn new(inner: M, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Return the wrapped model.
    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: CompletionModel> CompletionModel for RetryingModel<M> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.complete(prompt, params).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = match &e {
                        ModelError::RateLimit { retry_after: Some(hint), .. } => *hint,
                        _ => self.policy.backoff(attempt),
                    };
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying completion"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

//! Configuration for OpenAI-compatible chat-completion endpoints.

use std::time::Duration;

/// Default API base: Together.ai's OpenAI-compatible endpoint.
pub const TOGETHER_API_BASE: &str = "https://api.together.xyz/v1";

/// Default hosted model.
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-Vision-Free";

/// Environment variable holding the Together.ai credential.
pub const TOGETHER_API_KEY_ENV: &str = "TOGETHER_API_KEY";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for an [`OpenAICompatibleClient`](super::OpenAICompatibleClient).
///
/// The credential is optional at construction time so that a missing key
/// surfaces as an authentication error from the first completion call
/// rather than as a configuration failure.
#[derive(Clone, PartialEq)]
pub struct OpenAICompatibleConfig {
    /// Bearer credential sent with each request.
    pub api_key: Option<String>,
    /// API base URL, without the trailing `/chat/completions`.
    pub base_url: String,
    /// Hosted model identifier.
    pub model: String,
    /// Per-request timeout covering connect, send and receive.
    pub timeout: Duration,
}

impl Default for OpenAICompatibleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: TOGETHER_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// Hand-written so the credential never reaches logs.
impl std::fmt::Debug for OpenAICompatibleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICompatibleConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAICompatibleConfig {
    /// Create a config for the default endpoint with the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: Some(api_key.into()), ..Self::default() }
    }

    /// Create a config reading the credential from `TOGETHER_API_KEY`.
    ///
    /// An unset variable leaves the credential empty.
    pub fn from_env() -> Self {
        Self { api_key: std::env::var(TOGETHER_API_KEY_ENV).ok(), ..Self::default() }
    }

    /// Set or clear the credential.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Set the API base URL (e.g. `https://api.openai.com/v1`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the hosted model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The full chat-completions URL.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// The credential, if one is set and non-blank.
    pub(crate) fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let config = OpenAICompatibleConfig::default().with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let config = OpenAICompatibleConfig::new("   ");
        assert_eq!(config.credential(), None);
        assert_eq!(OpenAICompatibleConfig::new("key").credential(), Some("key"));
    }

    #[test]
    fn debug_output_redacts_credential() {
        let rendered = format!("{:?}", OpenAICompatibleConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

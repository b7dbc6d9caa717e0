//! OpenAI-compatible chat-completion client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::config::OpenAICompatibleConfig;
use crate::completion::{CompletionModel, GenerationParams};
use crate::error::{ModelError, Result};

const PROVIDER: &str = "OpenAI-compatible";

/// A [`CompletionModel`] for any endpoint speaking the OpenAI
/// `/chat/completions` protocol (Together.ai, OpenAI, vLLM, Ollama, ...).
///
/// The prompt is sent as a single user message. Requests are never retried
/// here; wrap the client in [`RetryingModel`](crate::RetryingModel) for that.
pub struct OpenAICompatibleClient {
    client: reqwest::Client,
    config: OpenAICompatibleConfig,
    url: String,
}

impl OpenAICompatibleClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] if the HTTP client cannot be built
    /// or the model identifier is empty.
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(ModelError::InvalidConfig("model must not be empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        let url = config.completions_url();
        Ok(Self { client, config, url })
    }

    /// Create a client for the default endpoint using `TOGETHER_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAICompatibleConfig::from_env())
    }

    /// Return the client configuration.
    pub fn config(&self) -> &OpenAICompatibleConfig {
        &self.config
    }
}

// ── Chat-completions request/response types ────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Map a non-success status and body onto the error taxonomy.
fn status_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> ModelError {
    let message =
        serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);
    let provider = PROVIDER.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ModelError::Authentication { provider, message }
        }
        StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimit { provider, message, retry_after },
        _ => ModelError::Upstream { provider, status: status.as_u16(), message },
    }
}

fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

// ── CompletionModel implementation ─────────────────────────────────────────

#[async_trait]
impl CompletionModel for OpenAICompatibleClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let Some(api_key) = self.config.credential() else {
            error!(provider = PROVIDER, "no API key configured");
            return Err(ModelError::Authentication {
                provider: PROVIDER.into(),
                message: "no API key configured".into(),
            });
        };

        debug!(
            provider = PROVIDER,
            model = %self.config.model,
            prompt_len = prompt.len(),
            temperature = params.temperature,
            max_tokens = params.max_tokens,
            "sending completion request"
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage { role: "user", content: prompt }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response =
            self.client.post(&self.url).bearer_auth(api_key).json(&body).send().await.map_err(
                |e| {
                    error!(provider = PROVIDER, error = %e, "request failed");
                    let message = if e.is_timeout() {
                        format!("request timed out after {:?}", self.config.timeout)
                    } else {
                        format!("request failed: {e}")
                    };
                    ModelError::Network { provider: PROVIDER.into(), message }
                },
            )?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(&response);
            let body = response.text().await.unwrap_or_default();
            error!(provider = PROVIDER, %status, "API error");
            return Err(status_error(status, body, retry_after));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            ModelError::Upstream {
                provider: PROVIDER.into(),
                status: status.as_u16(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ModelError::Upstream {
                provider: PROVIDER.into(),
                status: status.as_u16(),
                message: "response contained no completion".into(),
            })?;

        let text = text.trim().to_string();
        info!(
            provider = PROVIDER,
            model = %self.config.model,
            response_len = text.len(),
            "completion received"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        let auth = status_error(StatusCode::UNAUTHORIZED, String::new(), None);
        assert!(matches!(auth, ModelError::Authentication { .. }));

        let forbidden = status_error(StatusCode::FORBIDDEN, String::new(), None);
        assert!(matches!(forbidden, ModelError::Authentication { .. }));

        let retry_after = Some(Duration::from_secs(2));
        let limited = status_error(StatusCode::TOO_MANY_REQUESTS, String::new(), retry_after);
        assert!(matches!(
            limited,
            ModelError::RateLimit { retry_after: Some(d), .. } if d == Duration::from_secs(2)
        ));

        let upstream = status_error(StatusCode::BAD_REQUEST, "too long".into(), None);
        assert!(matches!(upstream, ModelError::Upstream { status: 400, .. }));
    }

    #[test]
    fn provider_error_message_is_extracted() {
        let body =
            r#"{"error":{"message":"prompt exceeds context window","type":"invalid_request"}}"#;
        match status_error(StatusCode::BAD_REQUEST, body.into(), None) {
            ModelError::Upstream { message, .. } => {
                assert_eq!(message, "prompt exceeds context window")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_model_is_rejected() {
        let config = OpenAICompatibleConfig::new("key").with_model(" ");
        assert!(matches!(OpenAICompatibleClient::new(config), Err(ModelError::InvalidConfig(_))));
    }
}

//! The completion model trait and its generation parameters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling randomness. `0.0` is deterministic.
    pub temperature: f32,
    /// Cap on the number of generated tokens.
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { temperature: 0.2, max_tokens: 512 }
    }
}

impl GenerationParams {
    /// Create parameters with the given temperature and token cap.
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self { temperature, max_tokens }
    }
}

/// A hosted text-generation model.
///
/// Implementations send a single user prompt and return the generated text,
/// trimmed of surrounding whitespace. A call either completes or fails; there
/// is no streaming and no cancellation once the request is issued.
///
/// # Example
///
/// ```rust,ignore
/// use folio_model::{CompletionModel, GenerationParams, OpenAICompatibleClient};
///
/// let model = OpenAICompatibleClient::from_env()?;
/// let text = model.complete("Say hi", &GenerationParams::default()).await?;
/// ```
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// The model identifier requests are sent to.
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
}

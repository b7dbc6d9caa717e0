//! OpenAI-compatible provider.
//!
//! Talks to any endpoint implementing `POST /chat/completions`. The defaults
//! target Together.ai's hosted Llama models:
//!
//! ```rust,ignore
//! use folio_model::openai::{OpenAICompatibleClient, OpenAICompatibleConfig};
//!
//! let client = OpenAICompatibleClient::new(
//!     OpenAICompatibleConfig::new(std::env::var("TOGETHER_API_KEY")?)
//!         .with_model("meta-llama/Llama-3.3-70B-Instruct-Turbo-Free"),
//! )?;
//! ```

mod client;
mod config;

pub use client::OpenAICompatibleClient;
pub use config::{
    DEFAULT_MODEL, DEFAULT_TIMEOUT, OpenAICompatibleConfig, TOGETHER_API_BASE,
    TOGETHER_API_KEY_ENV,
};

//! Scripted completion model for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::completion::{CompletionModel, GenerationParams};
use crate::error::Result;

/// A [`CompletionModel`] that replays scripted results and records prompts.
///
/// Scripted results are returned in order; once they run out, every call
/// returns the default response.
pub struct MockModel {
    name: String,
    default_response: String,
    scripted: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(String, GenerationParams)>>,
}

impl MockModel {
    /// Create a mock that always answers `default_response`.
    pub fn new(default_response: impl Into<String>) -> Self {
        Self {
            name: "mock".to_string(),
            default_response: default_response.into(),
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue results to return before falling back to the default response.
    pub fn with_results(self, results: impl IntoIterator<Item = Result<String>>) -> Self {
        self.scripted.lock().unwrap_or_else(|e| e.into_inner()).extend(results);
        self
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.iter().map(|(p, _)| p.clone()).collect()
    }

    /// Generation parameters received so far, in call order.
    pub fn params(&self) -> Vec<GenerationParams> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).iter().map(|(_, p)| *p).collect()
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push((prompt.to_string(), *params));
        let next = self.scripted.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
        match next {
            Some(result) => result.map(|text| text.trim().to_string()),
            None => Ok(self.default_response.trim().to_string()),
        }
    }
}

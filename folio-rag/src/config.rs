//! Configuration for the question-answering and summarization flows.

use folio_model::GenerationParams;
use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::index::DistanceMetric;

/// Configuration parameters for a [`DocumentAssistant`](crate::DocumentAssistant).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Distance used to rank chunks against the question.
    pub metric: DistanceMetric,
    /// Sampling temperature for both flows.
    pub temperature: f32,
    /// Token cap for answers.
    pub qa_max_tokens: u32,
    /// Token cap for summaries.
    pub summary_max_tokens: u32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 100,
            top_k: 3,
            metric: DistanceMetric::L2,
            temperature: 0.2,
            qa_max_tokens: 512,
            summary_max_tokens: 400,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Generation parameters for the question-answering flow.
    pub fn qa_params(&self) -> GenerationParams {
        GenerationParams::new(self.temperature, self.qa_max_tokens)
    }

    /// Generation parameters for the summarization flow.
    pub fn summary_params(&self) -> GenerationParams {
        GenerationParams::new(self.temperature, self.summary_max_tokens)
    }

    /// Check that the parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `chunk_size == 0` or `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `temperature` is not within `0.0..=2.0`
    /// - either token cap is zero
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RagError::Config(format!(
                "temperature ({}) must be between 0.0 and 2.0",
                self.temperature
            )));
        }
        if self.qa_max_tokens == 0 || self.summary_max_tokens == 0 {
            return Err(RagError::Config("max token caps must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of chunks retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.config.metric = metric;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the token cap for answers.
    pub fn qa_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.qa_max_tokens = max_tokens;
        self
    }

    /// Set the token cap for summaries.
    pub fn summary_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.summary_max_tokens = max_tokens;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// See [`RagConfig::validate`].
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

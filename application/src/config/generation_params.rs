//! Generation parameters: orchestration loop control.
//!
//! [`GenerationParams`] groups the static parameters that control one
//! [`GenerateDiagramUseCase`](crate::use_cases::generate_diagram::GenerateDiagramUseCase)
//! run: which model answers, its decoding settings, the repair ceiling, and
//! the behavioral policy.

use crate::ports::llm_gateway::CompletionOptions;
use flowgrid_domain::{Model, RepairPolicy};
use serde::{Deserialize, Serialize};

/// Decoding temperature used when nothing is configured.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Output ceiling in tokens: room for explanatory prose plus a diagram block.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Orchestration loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Model answering every attempt of a turn.
    pub model: Model,
    /// Decoding temperature.
    pub temperature: f32,
    /// Maximum output tokens per model call.
    pub max_tokens: u32,
    /// Retry ceiling for invalid diagrams.
    pub repair: RepairPolicy,
    /// Replacement for the built-in behavioral policy.
    pub system_prompt: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            repair: RepairPolicy::default(),
            system_prompt: None,
        }
    }
}

impl GenerationParams {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_max_repair_retries(mut self, max: u32) -> Self {
        self.repair = RepairPolicy::new(max);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Decoding options for a single model call.
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = GenerationParams::default();
        assert_eq!(params.model.as_str(), "deepseek/deepseek-chat");
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.max_tokens, 2000);
        assert_eq!(params.repair.max_retries, 2);
        assert!(params.system_prompt.is_none());
    }

    #[test]
    fn test_builder() {
        let params = GenerationParams::default()
            .with_model("openai/gpt-4.1".parse().unwrap())
            .with_temperature(0.2)
            .with_max_tokens(4000)
            .with_max_repair_retries(4)
            .with_system_prompt("Only draw flowcharts.");

        assert_eq!(params.repair.max_attempts(), 5);
        let options = params.completion_options();
        assert_eq!(options.model.as_str(), "openai/gpt-4.1");
        assert_eq!(options.temperature, 0.2);
        assert_eq!(options.max_tokens, 4000);
        assert_eq!(params.system_prompt.as_deref(), Some("Only draw flowcharts."));
    }
}

//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! once validated.

use crate::mermaid::DEFAULT_COMMAND;
use crate::openrouter::gateway::{
    DEFAULT_BASE_URL, DEFAULT_REFERER, DEFAULT_TITLE, OpenRouterSettings,
};
use flowgrid_application::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParams};
use flowgrid_domain::{DEFAULT_MODEL, MAX_REPAIR_RETRIES, Model, RepairPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{section}.timeout_seconds cannot be 0")]
    InvalidTimeout { section: &'static str },

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("invalid model name '{0}'")]
    InvalidModelName(String),

    #[error("generation.max_tokens must be greater than 0")]
    InvalidMaxTokens,

    #[error("generation.temperature must be between 0.0 and 2.0 (got {0})")]
    InvalidTemperature(f32),

    #[error("generation.max_repair_retries must be at most {max} (got {got})")]
    InvalidRepairRetries { got: u32, max: u32 },

    #[error("validator.command cannot be empty")]
    EmptyValidatorCommand,

    #[error("could not read system prompt file {path}: {reason}")]
    SystemPromptFile { path: String, reason: String },
}

/// Raw `[provider]` configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (prefer the environment variable)
    pub api_key: Option<String>,
    /// Chat-completions endpoint
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// HTTP-Referer header sent with every request
    pub referer: String,
    /// X-Title header sent with every request
    pub title: String,
    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            timeout_seconds: None,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: the direct value wins, then `api_key_env`.
    ///
    /// Blank values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Connection settings for the OpenRouter gateway
    pub fn openrouter_settings(&self) -> OpenRouterSettings {
        OpenRouterSettings {
            api_key: self.resolve_api_key(),
            base_url: self.base_url.clone(),
            referer: self.referer.clone(),
            title: self.title.clone(),
            timeout: self.timeout(),
        }
    }
}

/// Raw `[generation]` configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Repair attempts after the first invalid diagram
    pub max_repair_retries: u32,
    /// Replaces the built-in diagram policy
    pub system_prompt_file: Option<PathBuf>,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_repair_retries: RepairPolicy::default().max_retries,
            system_prompt_file: None,
        }
    }
}

/// Raw `[validator]` configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileValidatorConfig {
    /// When false, diagrams are returned unvalidated
    pub enabled: bool,
    /// Mermaid CLI executable
    pub command: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for FileValidatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: DEFAULT_COMMAND.to_string(),
            timeout_seconds: None,
        }
    }
}

impl FileValidatorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Raw `[server]` configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Listen address for `--serve`
    pub bind: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Raw `[logging]` configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL conversation event log
    pub conversation_log: Option<PathBuf>,
    /// Directory for the daily rolling log in server mode
    pub log_dir: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub generation: FileGenerationConfig,
    pub validator: FileValidatorConfig,
    pub server: FileServerConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.parse_model()?;

        if self.generation.max_tokens == 0 {
            return Err(ConfigValidationError::InvalidMaxTokens);
        }

        let retries = self.generation.max_repair_retries;
        if retries > MAX_REPAIR_RETRIES {
            return Err(ConfigValidationError::InvalidRepairRetries {
                got: retries,
                max: MAX_REPAIR_RETRIES,
            });
        }

        let temperature = self.generation.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigValidationError::InvalidTemperature(temperature));
        }

        if self.provider.timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout {
                section: "provider",
            });
        }
        if self.validator.timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout {
                section: "validator",
            });
        }

        if self.validator.enabled && self.validator.command.trim().is_empty() {
            return Err(ConfigValidationError::EmptyValidatorCommand);
        }

        Ok(())
    }

    fn parse_model(&self) -> Result<Model, ConfigValidationError> {
        let raw = self.provider.model.trim();
        if raw.is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        raw.parse()
            .map_err(|_| ConfigValidationError::InvalidModelName(raw.to_string()))
    }

    /// Build generation parameters, reading `system_prompt_file` if set.
    pub fn generation_params(&self) -> Result<GenerationParams, ConfigValidationError> {
        self.validate()?;

        let mut params = GenerationParams::default()
            .with_model(self.parse_model()?)
            .with_temperature(self.generation.temperature)
            .with_max_tokens(self.generation.max_tokens)
            .with_max_repair_retries(self.generation.max_repair_retries);

        if let Some(path) = &self.generation.system_prompt_file {
            let prompt = std::fs::read_to_string(path).map_err(|e| {
                ConfigValidationError::SystemPromptFile {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            params = params.with_system_prompt(prompt);
        }

        Ok(params)
    }
}

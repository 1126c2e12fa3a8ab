//! OpenRouter LLM Gateway implementation
//!
//! Sends the whole transcript to OpenRouter's OpenAI-compatible
//! chat-completions endpoint. One call per `complete`; no internal retries.

use super::error::{OpenRouterError, Result};
use super::protocol::{ChatCompletionRequest, ChatCompletionResponse, ErrorEnvelope};
use async_trait::async_trait;
use flowgrid_application::{CompletionOptions, GatewayError, LlmGateway};
use flowgrid_domain::Message;
use std::time::Duration;
use tracing::{debug, info};

/// Default OpenRouter API endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default HTTP-Referer header value
pub const DEFAULT_REFERER: &str = "http://localhost:3000";

/// Default X-Title header value
pub const DEFAULT_TITLE: &str = "FlowGrid";

/// Connection settings for [`OpenRouterGateway`]
#[derive(Debug, Clone)]
pub struct OpenRouterSettings {
    /// Bearer key; `None` leaves the gateway unconfigured.
    pub api_key: Option<String>,
    pub base_url: String,
    pub referer: String,
    pub title: String,
    /// Per-request timeout; `None` relies on the transport's own limits.
    pub timeout: Option<Duration>,
}

impl Default for OpenRouterSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            timeout: None,
        }
    }
}

/// LLM Gateway implementation for OpenRouter
pub struct OpenRouterGateway {
    client: reqwest::Client,
    settings: OpenRouterSettings,
}

impl OpenRouterGateway {
    /// Create a new gateway
    ///
    /// # Errors
    ///
    /// Returns `OpenRouterError::ClientBuild` if the HTTP client cannot be constructed
    pub fn new(settings: OpenRouterSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| OpenRouterError::ClientBuild(e.to_string()))?;

        info!(
            "OpenRouterGateway initialized (endpoint: {}, key configured: {})",
            settings.base_url,
            settings.api_key.is_some()
        );

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &OpenRouterSettings {
        &self.settings
    }

    async fn send(&self, messages: &[Message], options: &CompletionOptions) -> Result<String> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(OpenRouterError::MissingApiKey)?;

        debug!(
            provider = "openrouter",
            model = %options.model,
            max_tokens = options.max_tokens,
            temperature = options.temperature,
            messages = messages.len(),
            "Invoking OpenRouter"
        );

        let body = ChatCompletionRequest::new(messages, options);
        let response = self
            .client
            .post(&self.settings.base_url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.settings.referer)
            .header("X-Title", &self.settings.title)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string();
            let detail = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .map(|envelope| envelope.error.message);
            let status_text = match detail {
                Some(message) if !message.is_empty() => format!("{} ({})", reason, message),
                _ => reason,
            };
            return Err(OpenRouterError::Api {
                status: status.as_u16(),
                status_text,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| OpenRouterError::Decode(e.to_string()))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                provider = "openrouter",
                tokens_input = usage.prompt_tokens,
                tokens_output = usage.completion_tokens,
                "OpenRouter invocation completed"
            );
        }

        Ok(parsed.first_content())
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> std::result::Result<String, GatewayError> {
        self.send(messages, options).await.map_err(GatewayError::from)
    }

    fn is_configured(&self) -> bool {
        self.settings
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

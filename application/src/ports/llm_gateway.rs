//! LLM Gateway port
//!
//! Defines the interface for communicating with the generative text model.

use async_trait::async_trait;
use flowgrid_domain::{Message, Model};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Upstream API error: {status_text}")]
    Upstream { status: u16, status_text: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Decoding options for a single completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: Model,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Gateway for LLM communication
///
/// One call sends the whole instruction sequence and returns the generated
/// text. Implementations must not retry on their own; retries belong to the
/// repair loop and are driven by validation, not transport, failures.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate a reply for `messages`.
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, GatewayError>;

    /// Whether credentials for the upstream service are present.
    fn is_configured(&self) -> bool {
        true
    }
}

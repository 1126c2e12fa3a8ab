//! Error types for the OpenRouter adapter

use flowgrid_application::GatewayError;
use thiserror::Error;

/// Result type alias for OpenRouter operations
pub type Result<T> = std::result::Result<T, OpenRouterError>;

/// Errors that can occur when talking to OpenRouter
#[derive(Error, Debug)]
pub enum OpenRouterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenRouter API error: {status_text}")]
    Api {
        status: u16,
        status_text: String,
    },

    #[error("Failed to parse OpenRouter response: {0}")]
    Decode(String),

    #[error("OpenRouter API key not configured")]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl From<OpenRouterError> for GatewayError {
    fn from(err: OpenRouterError) -> Self {
        match err {
            OpenRouterError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            OpenRouterError::Http(e) if e.is_connect() => {
                GatewayError::ConnectionError(e.to_string())
            }
            OpenRouterError::Http(e) => GatewayError::Other(e.to_string()),
            OpenRouterError::Api {
                status,
                status_text,
            } => GatewayError::Upstream {
                status,
                status_text: format!("OpenRouter API error: {}", status_text),
            },
            OpenRouterError::Decode(msg) => GatewayError::InvalidResponse(msg),
            e @ OpenRouterError::MissingApiKey => GatewayError::NotConfigured(e.to_string()),
            OpenRouterError::ClientBuild(msg) => GatewayError::Other(msg),
        }
    }
}

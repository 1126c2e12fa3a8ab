//! OpenRouter adapter
//!
//! Implements LlmGateway for OpenRouter's chat-completions API.

pub mod error;
pub mod gateway;
pub mod protocol;

//! Infrastructure layer for flowgrid
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod mermaid;
pub mod openrouter;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGenerationConfig, FileLoggingConfig,
    FileProviderConfig, FileServerConfig, FileValidatorConfig,
};
pub use logging::JsonlConversationLogger;
pub use mermaid::{MermaidCli, MermaidCliError};
pub use openrouter::{
    error::OpenRouterError,
    gateway::{OpenRouterGateway, OpenRouterSettings},
};

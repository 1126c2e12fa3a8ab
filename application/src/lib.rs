//! Application layer for flowgrid
//!
//! This crate contains the generation use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParams};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    diagram_renderer::{DiagramRenderer, RenderError},
    diagram_validator::{DiagramValidator, DisabledValidator},
    llm_gateway::{CompletionOptions, GatewayError, LlmGateway},
    progress::{GenerationProgress, NoProgress},
};
pub use use_cases::generate_diagram::{GenerateDiagramError, GenerateDiagramUseCase};

//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod diagram_renderer;
pub mod diagram_validator;
pub mod llm_gateway;
pub mod progress;

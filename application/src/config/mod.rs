//! Application-level configuration.
//!
//! - [`GenerationParams`]: model, decoding settings, repair ceiling and policy

pub mod generation_params;

pub use generation_params::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParams};

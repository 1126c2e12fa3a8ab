//! Interactive chat module
//!
//! Provides a reedline-based interactive chat interface for FlowGrid.

mod repl;

pub use repl::{ChatRepl, ChatTurnError, assistant_turn};

//! Presentation layer for flowgrid
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, the interactive chat interface and HTTP routes.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, OutputFormat};
pub use cli::history::{HistoryFileError, load_history};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use server::AppState;

//! Mermaid renderer integration

mod cli;

pub use cli::{DEFAULT_COMMAND, MermaidCli, MermaidCliError};

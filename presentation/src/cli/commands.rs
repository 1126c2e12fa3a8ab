//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for a generated turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Reply text followed by the diagram
    #[default]
    Text,
    /// The full result as JSON
    Json,
    /// Only the diagram code
    Diagram,
}

/// CLI arguments for flowgrid
#[derive(Parser, Debug)]
#[command(name = "flowgrid")]
#[command(author, version, about = "Conversational Mermaid diagram generation")]
#[command(long_about = r#"
FlowGrid turns a chat message into a conversational reply and a Mermaid
diagram. Generated diagrams are syntax-checked with the Mermaid CLI (mmdc);
invalid ones are sent back to the model with the parser error until they
validate or the repair limit is reached.

Configuration files are loaded from (in priority order):
1. FLOWGRID_* environment variables (e.g. FLOWGRID_PROVIDER__MODEL)
2. --config <path>     Explicit config file
3. ./flowgrid.toml     Project-level config
4. ~/.config/flowgrid/config.toml   Global config

The API key is read from OPENROUTER_API_KEY unless provider.api_key_env says
otherwise.

Example:
  flowgrid "Draw the login flow: form, validate, dashboard or error"
  flowgrid --history turns.json "Add a password reset branch" -o json
  flowgrid "CI pipeline with build, test and deploy" --render pipeline.svg
  flowgrid --chat
  flowgrid --serve
"#)]
pub struct Cli {
    /// The message to send (not required in chat or serve mode)
    pub message: Option<String>,

    /// JSON file with prior turns: [{"role":"user","content":"..."}, ...]
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Start interactive chat mode
    #[arg(short, long, conflicts_with = "serve")]
    pub chat: bool,

    /// Serve the HTTP chat endpoint
    #[arg(long)]
    pub serve: bool,

    /// Listen address for --serve (overrides server.bind)
    #[arg(long, value_name = "ADDR", requires = "serve")]
    pub bind: Option<String>,

    /// Model to use (overrides provider.model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Repair attempts after an invalid diagram (overrides generation.max_repair_retries)
    #[arg(long, value_name = "N")]
    pub max_repairs: Option<u32>,

    /// Skip Mermaid syntax validation
    #[arg(long)]
    pub no_validate: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Render the diagram to a file (.svg, .png or .pdf)
    #[arg(long, value_name = "FILE")]
    pub render: Option<PathBuf>,

    /// Theme for --render (default, dark, forest, neutral)
    #[arg(long, value_name = "THEME", default_value = "default")]
    pub theme: String,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

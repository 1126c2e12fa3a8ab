//! Mermaid CLI (`mmdc`) adapter.
//!
//! Validation is a render to SVG whose output is thrown away: `mmdc` exits
//! non-zero and prints the parser message on stderr when the diagram does
//! not parse. Export renders use the same invocation with the requested
//! format and theme.

use async_trait::async_trait;
use flowgrid_application::{DiagramRenderer, DiagramValidator, RenderError};
use flowgrid_domain::{RenderFormat, RenderOptions, Theme, ValidationOutcome};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default executable name
pub const DEFAULT_COMMAND: &str = "mmdc";

const INPUT_FILE: &str = "diagram.mmd";

/// Errors from invoking the Mermaid CLI
#[derive(Debug, Error)]
pub enum MermaidCliError {
    #[error("Mermaid CLI '{0}' not found in PATH")]
    NotFound(String),

    #[error("Failed to run Mermaid CLI: {0}")]
    Spawn(String),

    #[error("Mermaid CLI timed out after {0:?}")]
    Timeout(Duration),

    /// Non-zero exit; carries stderr as printed.
    #[error("{0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validator and renderer backed by the `mmdc` executable
#[derive(Debug, Clone)]
pub struct MermaidCli {
    command: String,
    timeout: Option<Duration>,
}

impl MermaidCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the executable can be located
    pub fn is_available(&self) -> bool {
        which::which(&self.command).is_ok()
    }

    fn resolve(&self) -> Result<PathBuf, MermaidCliError> {
        which::which(&self.command).map_err(|_| MermaidCliError::NotFound(self.command.clone()))
    }

    /// Render `diagram` and return the artifact bytes.
    pub async fn run(
        &self,
        diagram: &str,
        format: RenderFormat,
        theme: Theme,
    ) -> Result<Vec<u8>, MermaidCliError> {
        let program = self.resolve()?;
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join(INPUT_FILE);
        let output = workdir
            .path()
            .join(format!("diagram.{}", format.extension()));
        tokio::fs::write(&input, diagram).await?;

        let mut cmd = Command::new(&program);
        cmd.arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-t")
            .arg(theme.as_str())
            .arg("--quiet")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            "Running {} ({}, theme {})",
            program.display(),
            format.extension(),
            theme.as_str()
        );

        let child = cmd
            .spawn()
            .map_err(|e| MermaidCliError::Spawn(e.to_string()))?;

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| MermaidCliError::Timeout(limit))?,
            None => child.wait_with_output().await,
        };
        let result = result.map_err(|e| MermaidCliError::Spawn(e.to_string()))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let detail = stderr.trim();
            let detail = if detail.is_empty() {
                format!("{} exited with {}", self.command, result.status)
            } else {
                detail.to_string()
            };
            return Err(MermaidCliError::Rejected(detail));
        }

        Ok(tokio::fs::read(&output).await?)
    }
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

#[async_trait]
impl DiagramValidator for MermaidCli {
    async fn validate(&self, diagram: &str) -> ValidationOutcome {
        match self.run(diagram, RenderFormat::Svg, Theme::Default).await {
            Ok(_) => ValidationOutcome::valid(),
            Err(MermaidCliError::Rejected(detail)) => ValidationOutcome::invalid(detail),
            Err(e) => {
                // Spawn failure or timeout counts as invalid
                warn!("Mermaid validation could not run: {}", e);
                ValidationOutcome::invalid(e.to_string())
            }
        }
    }
}

#[async_trait]
impl DiagramRenderer for MermaidCli {
    async fn render(&self, diagram: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        self.run(diagram, options.format, options.theme)
            .await
            .map_err(|e| match e {
                MermaidCliError::Rejected(detail) => RenderError::Syntax(detail),
                e @ MermaidCliError::NotFound(_) => RenderError::Unavailable(e.to_string()),
                e => RenderError::Failed(e.to_string()),
            })
    }
}

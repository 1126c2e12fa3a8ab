//! Diagram rendering port
//!
//! Turns diagram-description text into a visual artifact for export.

use async_trait::async_trait;
use flowgrid_domain::RenderOptions;
use thiserror::Error;

/// Errors that can occur while rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Renderer unavailable: {0}")]
    Unavailable(String),

    #[error("Render failed: {0}")]
    Failed(String),
}

/// Renderer producing the bytes of an SVG, PNG or PDF artifact.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    async fn render(&self, diagram: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError>;
}

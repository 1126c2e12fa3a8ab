//! Generation result and the reply assembly rules

use crate::diagram::extraction::strip_diagram_blocks;
use serde::{Deserialize, Serialize};

/// Reply used when nothing but diagram code remains after stripping.
pub const FALLBACK_REPLY: &str = "I've created a diagram for you based on your request.";

/// What happened to the diagram in this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramStatus {
    /// No diagram block in the final reply (clarifying turn).
    Absent,
    /// The diagram passed validation.
    Valid,
    /// Validation is disabled; the diagram was returned unchecked.
    Unvalidated,
    /// Still invalid after the last repair attempt; returned as-is.
    Exhausted,
}

/// Output of one user turn (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Final diagram code; empty when none was produced.
    pub diagram_text: String,
    /// Conversational text with every diagram block removed. Never empty.
    pub reply_text: String,
    pub status: DiagramStatus,
    /// Last validator error when the repair loop gave up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_error: Option<String>,
    /// Number of model calls made for this turn.
    pub attempts: u32,
}

impl GenerationResult {
    /// Assemble the result from the final raw model reply.
    pub fn assemble(
        raw_reply: &str,
        diagram_text: impl Into<String>,
        status: DiagramStatus,
        syntax_error: Option<String>,
        attempts: u32,
    ) -> Self {
        let stripped = strip_diagram_blocks(raw_reply);
        let reply_text = if stripped.is_empty() {
            FALLBACK_REPLY.to_string()
        } else {
            stripped
        };

        Self {
            diagram_text: diagram_text.into(),
            reply_text,
            status,
            syntax_error,
            attempts,
        }
    }

    pub fn has_diagram(&self) -> bool {
        !self.diagram_text.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.status == DiagramStatus::Exhausted
    }
}

//! Diagram validation port
//!
//! Syntax checking is delegated to the external renderer's parse entry point.

use async_trait::async_trait;
use flowgrid_domain::ValidationOutcome;

/// Syntax checker for diagram-description text.
#[async_trait]
pub trait DiagramValidator: Send + Sync {
    /// Check `diagram` (never empty). The renderer's error message must be
    /// returned verbatim in [`ValidationOutcome::error_detail`].
    async fn validate(&self, diagram: &str) -> ValidationOutcome;

    /// Disabled validators are skipped and diagrams are returned unchecked.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Validator used when syntax checking is turned off.
pub struct DisabledValidator;

#[async_trait]
impl DiagramValidator for DisabledValidator {
    async fn validate(&self, _diagram: &str) -> ValidationOutcome {
        ValidationOutcome::valid()
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

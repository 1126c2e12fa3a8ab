//! Progress notification port
//!
//! Defines the interface for reporting progress while a turn is generated.

use flowgrid_domain::{GenerationResult, ValidationOutcome};

/// Callback for progress updates during generation
///
/// Implementations live in the presentation layer (spinner, plain text, ...).
pub trait GenerationProgress: Send + Sync {
    /// Called before each model call. `attempt` starts at 1.
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    /// Called when the model replied.
    fn on_model_reply(&self, _attempt: u32, _has_diagram: bool) {}

    /// Called after each validation.
    fn on_validation(&self, _attempt: u32, _outcome: &ValidationOutcome) {}

    /// Called once the result is assembled.
    fn on_complete(&self, _result: &GenerationResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl GenerationProgress for NoProgress {}

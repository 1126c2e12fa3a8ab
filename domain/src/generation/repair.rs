//! Repair loop state machine.
//!
//! ```text
//! Initial -> Validating -> Valid
//!                       -> Retrying -> Validating ...
//!                       -> Exhausted
//! ```
//!
//! The loop is entered only once a non-empty diagram has been extracted.
//! Each retry counts exactly once, whether or not the retried reply carried
//! a diagram at all.

use crate::diagram::validation::ValidationOutcome;
use serde::{Deserialize, Serialize};

/// Detail used when a validator reports failure without a message.
pub const GENERIC_SYNTAX_ERROR: &str = "Invalid Mermaid syntax";

/// Largest retry ceiling accepted from configuration.
pub const MAX_REPAIR_RETRIES: u32 = 10;

/// Retry ceiling for invalid diagrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairPolicy {
    /// Repair attempts after the initial generation.
    pub max_retries: u32,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self { max_retries: 2 }
    }
}

impl RepairPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Upper bound on model calls per turn.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Position in the repair state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairState {
    Initial,
    Validating,
    Retrying { retry: u32 },
    Valid,
    Exhausted,
}

impl RepairState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RepairState::Valid | RepairState::Exhausted)
    }
}

/// What the orchestrator should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairStep {
    /// Diagram is valid; stop.
    Accept,
    /// Re-prompt the model with this error.
    Retry { retry: u32, error: String },
    /// Ceiling reached; return the last attempt with this error.
    GiveUp { error: String },
}

/// Tracks retries and the last known error across one turn.
#[derive(Debug, Clone)]
pub struct RepairLoop {
    policy: RepairPolicy,
    retries: u32,
    last_error: Option<String>,
    state: RepairState,
}

impl RepairLoop {
    pub fn new(policy: RepairPolicy) -> Self {
        Self {
            policy,
            retries: 0,
            last_error: None,
            state: RepairState::Initial,
        }
    }

    pub fn state(&self) -> RepairState {
        self.state
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Mark that a diagram is about to be validated.
    pub fn begin_validation(&mut self) {
        self.state = RepairState::Validating;
    }

    /// Feed the outcome of validating the latest diagram.
    pub fn record_outcome(&mut self, outcome: ValidationOutcome) -> RepairStep {
        if outcome.valid {
            self.state = RepairState::Valid;
            return RepairStep::Accept;
        }

        self.last_error = Some(
            outcome
                .error_detail
                .unwrap_or_else(|| GENERIC_SYNTAX_ERROR.to_string()),
        );
        self.advance()
    }

    /// A retried reply carried no diagram; the previous error still stands.
    pub fn record_missing_diagram(&mut self) -> RepairStep {
        self.advance()
    }

    fn advance(&mut self) -> RepairStep {
        let error = self
            .last_error
            .clone()
            .unwrap_or_else(|| GENERIC_SYNTAX_ERROR.to_string());

        if self.retries < self.policy.max_retries {
            self.retries += 1;
            self.state = RepairState::Retrying {
                retry: self.retries,
            };
            RepairStep::Retry {
                retry: self.retries,
                error,
            }
        } else {
            self.state = RepairState::Exhausted;
            RepairStep::GiveUp { error }
        }
    }
}

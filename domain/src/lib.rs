//! Domain layer for flowgrid
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Transcript
//!
//! An ordered sequence of role-tagged [`Message`]s forming the model's context
//! window. Order is meaningful and is only ever appended to.
//!
//! ## Diagram fences
//!
//! Generated replies carry Mermaid code inside a ```` ```mermaid ```` fenced
//! block. The [`diagram`] module finds, extracts and strips those blocks.
//!
//! ## Repair loop
//!
//! A model reply whose diagram fails validation is fed back to the model with
//! the validator's error, up to a fixed number of retries
//! ([`RepairPolicy`], [`RepairLoop`]).

pub mod core;
pub mod diagram;
pub mod generation;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model::{DEFAULT_MODEL, Model},
};
pub use diagram::{
    extraction::{count_diagram_blocks, extract_diagram, strip_diagram_blocks},
    fence::{DiagramFence, MERMAID_FENCE_TAG, find_diagram_fences},
    render::{RenderFormat, RenderOptions, Theme},
    validation::ValidationOutcome,
};
pub use generation::{
    repair::{MAX_REPAIR_RETRIES, RepairLoop, RepairPolicy, RepairState, RepairStep},
    request::GenerationRequest,
    result::{DiagramStatus, FALLBACK_REPLY, GenerationResult},
};
pub use prompt::{assembler::assemble_instructions, template::PromptTemplate};
pub use session::entities::{Message, Role, Transcript};

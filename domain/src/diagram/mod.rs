//! Diagram-description text and the fenced blocks that carry it.
//!
//! - [`fence`]: locating ```` ```mermaid ```` blocks in generated text
//! - [`extraction`]: first-block extraction and all-block stripping
//! - [`validation::ValidationOutcome`]: result of one syntax check
//! - [`render`]: theme and format options for the external renderer

pub mod extraction;
pub mod fence;
pub mod render;
pub mod validation;

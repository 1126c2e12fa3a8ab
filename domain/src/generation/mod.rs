//! Generation domain: one user turn in, one reply plus diagram out.
//!
//! - [`request::GenerationRequest`]: validated, immutable turn input
//! - [`result::GenerationResult`]: clean reply text and final diagram
//! - [`repair`]: bounded retry state machine for invalid diagrams

pub mod repair;
pub mod request;
pub mod result;

//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: identifier of the generative model answering a turn
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;

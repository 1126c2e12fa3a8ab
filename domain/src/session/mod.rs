//! Conversation domain.
//!
//! - [`entities::Message`]: a single role-tagged turn
//! - [`entities::Transcript`]: the ordered, append-only model context

pub mod entities;

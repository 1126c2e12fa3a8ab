//! Prompt domain
//!
//! The behavioral policy, the repair instruction, and assembly of the
//! instruction sequence sent to the model.

pub mod assembler;
pub mod template;

pub use assembler::assemble_instructions;
pub use template::PromptTemplate;

//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("Invalid history entry at position {index}: role '{role}' is not allowed")]
    InvalidHistoryRole { index: usize, role: String },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Unsupported render format: {0}")]
    UnsupportedRenderFormat(String),
}

impl DomainError {
    /// Check if this error was caused by malformed caller input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyMessage | DomainError::InvalidHistoryRole { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_display() {
        assert_eq!(DomainError::EmptyMessage.to_string(), "Message is required");
    }

    #[test]
    fn test_is_client_error_check() {
        assert!(DomainError::EmptyMessage.is_client_error());
        assert!(
            DomainError::InvalidHistoryRole {
                index: 0,
                role: "system".to_string()
            }
            .is_client_error()
        );
        assert!(!DomainError::InvalidModel(String::new()).is_client_error());
        assert!(!DomainError::UnknownTheme("neon".to_string()).is_client_error());
    }
}

//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("Message content cannot be empty")]
    EmptyMessage,

    #[error("Invalid generation parameter: {0}")]
    InvalidGenerationParams(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::EmptyMessage.to_string(),
            "Message content cannot be empty"
        );
        assert_eq!(
            DomainError::InvalidGenerationParams("max_tokens must be positive".to_string())
                .to_string(),
            "Invalid generation parameter: max_tokens must be positive"
        );
    }
}

//! Validation error type for CLI arguments and configuration values

use std::fmt;

/// Error raised when arguments or configuration values fail validation
///
/// Always user-actionable: the message names the offending option and what
/// is expected instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    /// The validation failure message
    pub fn details(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error: {}", self.message)
    }
}

impl std::error::Error for ValidationError {}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.message.clone())
    }
}

/// Validate a worker thread count value
pub fn validate_thread_count(value: usize) -> Result<usize, ValidationError> {
    if value == 0 {
        return Err(ValidationError::new(
            "Option --threads must be greater than 0",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_handling::ContextualError;

    #[test]
    fn test_validation_error_is_user_actionable() {
        let err = ValidationError::new("Missing required option --path");

        assert!(err.is_user_actionable());
        assert_eq!(
            err.user_message().as_deref(),
            Some("Missing required option --path")
        );
        assert_eq!(err.details(), "Missing required option --path");
        assert!(err.to_string().starts_with("Validation error:"));
    }

    #[test]
    fn test_validate_thread_count() {
        assert_eq!(validate_thread_count(1).unwrap(), 1);
        assert_eq!(validate_thread_count(64).unwrap(), 64);
        assert!(validate_thread_count(0).is_err());
    }
}

//! Generic error handling utilities
//!
//! Provides unified error reporting across the scanner's error types while
//! keeping domain-specific messages for errors the user can act on.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// User-actionable errors (a missing database file, a log destination in a
/// read-only directory, a bad argument) show their specific message. System
/// errors (thread spawn failures, poisoned locks) show the operation context,
/// with the detail available at debug level.
///
/// # Implementation Consistency
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`. When it returns `false`, `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on directly
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<String>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Arguments
/// * `error` - The error to handle (must implement ContextualError)
/// * `operation_context` - Human-readable description of the operation that failed
///
/// # Examples
/// ```rust,no_run
/// # use sigscan::core::error_handling::log_error_with_context;
/// # use sigscan::core::validation::ValidationError;
/// let err = ValidationError::new("Missing required option --base");
/// log_error_with_context(&err, "Argument validation");
/// // Logs: "FATAL: Missing required option --base"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

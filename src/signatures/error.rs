//! Signature Database Error Types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Signature database '{}' cannot be opened: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed reading signature database '{}' at line {line}: {source}", .path.display())]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl crate::core::error_handling::ContextualError for DatabaseError {
    fn is_user_actionable(&self) -> bool {
        // A missing or unreadable --base path is something the user fixes
        matches!(self, DatabaseError::Unreadable { .. })
    }

    fn user_message(&self) -> Option<String> {
        match self {
            DatabaseError::Unreadable { .. } => Some(self.to_string()),
            DatabaseError::Read { .. } => None,
        }
    }
}

/// Result type for signature database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

//! Scanner Error Types

use crate::core::error_handling::ContextualError;
use crate::pool::PoolError;
use crate::signatures::DatabaseError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Signature database could not be loaded; fatal, no scan starts
    #[error(transparent)]
    DatabaseUnreadable(#[from] DatabaseError),

    /// A subtree or entry could not be traversed; counted, scan continues
    #[error("Cannot traverse '{}': {message}", .path.display())]
    Traversal { path: PathBuf, message: String },

    /// A single file could not be hashed; counted, scan continues
    #[error("Cannot compute digest of '{}': {source}", .path.display())]
    DigestComputation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Match log destination could not be opened; fatal before any work starts
    #[error("Match log '{}' cannot be opened: {source}", .path.display())]
    LogSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single match line could not be written
    #[error("Match log write failed: {message}")]
    LogWrite { message: String },

    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl From<walkdir::Error> for ScanError {
    fn from(error: walkdir::Error) -> Self {
        let path = error.path().map(PathBuf::from).unwrap_or_default();
        ScanError::Traversal {
            path,
            message: error.to_string(),
        }
    }
}

impl ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ScanError::DatabaseUnreadable(e) => e.is_user_actionable(),
            ScanError::LogSink { .. } => true,
            ScanError::Pool(e) => e.is_user_actionable(),
            ScanError::Traversal { .. }
            | ScanError::DigestComputation { .. }
            | ScanError::LogWrite { .. } => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            ScanError::DatabaseUnreadable(e) => e.user_message(),
            ScanError::LogSink { .. } => Some(self.to_string()),
            ScanError::Pool(e) => e.user_message(),
            _ => None,
        }
    }
}

/// Result type for scanner operations
pub type ScannerResult<T> = Result<T, ScanError>;

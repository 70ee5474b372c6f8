//! Worker Pool Error Types

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Worker pool requires at least one worker")]
    InvalidWorkerCount,

    #[error("Worker pool is already shutting down")]
    AlreadyShuttingDown,

    #[error("Failed to spawn worker thread: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    #[error("Worker pool state unavailable: {message}")]
    Poisoned { message: String },
}

impl crate::core::error_handling::ContextualError for PoolError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, PoolError::InvalidWorkerCount)
    }

    fn user_message(&self) -> Option<String> {
        match self {
            PoolError::InvalidWorkerCount => Some(self.to_string()),
            _ => None,
        }
    }
}

/// Result type for worker pool operations
pub type PoolResult<T> = Result<T, PoolError>;

//! Synchronization utilities for robust mutex handling
//!
//! Converts mutex poisoning into application errors so a panic on one worker
//! surfaces as a typed failure on the next lock holder instead of a second panic.

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// # Arguments
/// * `result` - The result from a mutex lock operation
/// * `error_constructor` - Function to create the appropriate error type
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use sigscan::core::sync::handle_mutex_poison;
/// use sigscan::pool::PoolError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| PoolError::Poisoned { message })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

/// Take the guard out of a lock result even if the mutex is poisoned
///
/// Used where there is no caller to report to (worker loops, `Drop`,
/// accessors) and the protected data is still structurally valid.
pub fn recover_poisoned<T>(result: LockResult<T>) -> T {
    result.unwrap_or_else(|poison_err| {
        log::warn!("Recovering from poisoned lock");
        poison_err.into_inner()
    })
}

//! Worker Pool
//!
//! A fixed number of OS threads consuming one shared, unbounded FIFO queue.
//!
//! ## Shutdown protocol
//!
//! - Submission and shutdown initiation are serialised by the queue lock:
//!   after `shutdown` sets the terminating flag, `submit` fails with
//!   `AlreadyShuttingDown` instead of enqueueing work that would never run.
//! - `ShutdownMode::Drain` lets workers empty the queue, then joins them.
//!   The join is what makes every item's side effects visible to the caller.
//! - `ShutdownMode::Immediate` lets each worker finish its current item and
//!   drops everything still queued.
//!
//! A panic inside a work item is caught on the worker; the worker keeps
//! consuming the queue.

pub mod error;
pub mod thread_pool;
pub mod worker;

pub use error::{PoolError, PoolResult};
pub use thread_pool::{ShutdownReport, WorkerPool};
pub use worker::{ShutdownMode, WorkItem, WorkerState};

//! Fixed-size thread pool with drain and immediate shutdown

use crate::core::sync::{handle_mutex_poison, recover_poisoned};
use crate::pool::error::{PoolError, PoolResult};
use crate::pool::worker::{worker_loop, Shared, ShutdownMode, WorkerState};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Counters returned by [`WorkerPool::shutdown`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Items that ran to completion (including ones that panicked)
    pub completed: usize,
    /// Items whose closure panicked
    pub panicked: usize,
    /// Queued items dropped without running (immediate shutdown only)
    pub abandoned: usize,
}

/// Pool of OS threads consuming one unbounded FIFO queue
///
/// `submit` never blocks. The pool is shut down explicitly with
/// [`WorkerPool::shutdown`]; dropping a pool that is still active performs
/// an immediate shutdown and joins every worker.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl WorkerPool {
    /// Spawn `worker_count` worker threads
    pub fn new(worker_count: usize) -> PoolResult<Self> {
        if worker_count == 0 {
            return Err(PoolError::InvalidWorkerCount);
        }

        let shared = Arc::new(Shared::new(worker_count));
        let mut handles = Vec::with_capacity(worker_count);

        for index in 0..worker_count {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("sigscan-worker-{}", index))
                .spawn(move || worker_loop(index, &worker_shared));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    // Stop the workers already running before reporting
                    let pool = Self {
                        shared,
                        workers: Mutex::new(handles),
                        worker_count: index,
                    };
                    drop(pool);
                    return Err(PoolError::Spawn { source });
                }
            }
        }

        log::debug!("Worker pool started with {} workers", worker_count);
        Ok(Self {
            shared,
            workers: Mutex::new(handles),
            worker_count,
        })
    }

    /// Enqueue one unit of work
    ///
    /// Fails with [`PoolError::AlreadyShuttingDown`] once shutdown has begun.
    pub fn submit<F>(&self, work: F) -> PoolResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = handle_mutex_poison(self.shared.state.lock(), |message| {
            PoolError::Poisoned { message }
        })?;
        if state.terminating {
            return Err(PoolError::AlreadyShuttingDown);
        }
        state.queue.push_back(Box::new(work));
        drop(state);

        self.shared.task_pushed.notify_one();
        Ok(())
    }

    /// Stop accepting work and join every worker
    ///
    /// With [`ShutdownMode::Drain`] this returns only after every queued item
    /// has run, and all of their side effects are visible to the caller.
    /// With [`ShutdownMode::Immediate`] in-flight items finish and queued
    /// items are dropped.
    pub fn shutdown(&self, mode: ShutdownMode) -> PoolResult<ShutdownReport> {
        {
            let mut state = handle_mutex_poison(self.shared.state.lock(), |message| {
                PoolError::Poisoned { message }
            })?;
            if state.terminating {
                return Err(PoolError::AlreadyShuttingDown);
            }
            state.terminating = true;
            state.mode = mode;
        }
        self.shared.task_pushed.notify_all();

        let handles = std::mem::take(&mut *recover_poisoned(self.workers.lock()));
        for handle in handles {
            if handle.join().is_err() {
                log::error!("Worker thread terminated abnormally");
            }
        }

        let abandoned_items = std::mem::take(&mut recover_poisoned(self.shared.state.lock()).queue);
        let abandoned = abandoned_items.len();
        drop(abandoned_items);

        let report = ShutdownReport {
            completed: self.shared.completed.load(Ordering::Relaxed),
            panicked: self.shared.panicked.load(Ordering::Relaxed),
            abandoned,
        };
        log::debug!("Worker pool stopped ({:?}): {:?}", mode, report);
        Ok(report)
    }

    /// True until shutdown has been initiated
    pub fn is_active(&self) -> bool {
        !recover_poisoned(self.shared.state.lock()).terminating
    }

    /// Number of items waiting in the queue
    pub fn queue_len(&self) -> usize {
        recover_poisoned(self.shared.state.lock()).queue.len()
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Snapshot of every worker's current state
    pub fn worker_states(&self) -> Vec<WorkerState> {
        recover_poisoned(self.shared.state.lock())
            .worker_states
            .clone()
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("worker_count", &self.worker_count)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.is_active() {
            if let Err(e) = self.shutdown(ShutdownMode::Immediate) {
                log::warn!("Worker pool shutdown on drop failed: {}", e);
            }
        }
    }
}

//! Worker thread loop and the queue state it shares with the pool handle

use crate::core::sync::recover_poisoned;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

/// One deferred unit of work
pub type WorkItem = Box<dyn FnOnce() + Send + 'static>;

/// How a pool shutdown treats work that is queued but not started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Run every queued item before the workers stop
    Drain,
    /// Finish in-flight items only; queued items are dropped
    Immediate,
}

/// Lifecycle of a single worker thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Executing,
    Stopped,
}

/// Queue and lifecycle flags, guarded by one mutex
///
/// `submit` and shutdown initiation both take this lock, so once
/// `terminating` is set no further item can enter the queue.
pub(crate) struct PoolState {
    pub(crate) queue: VecDeque<WorkItem>,
    pub(crate) terminating: bool,
    pub(crate) mode: ShutdownMode,
    pub(crate) worker_states: Vec<WorkerState>,
}

/// State shared between the pool handle and every worker thread
pub(crate) struct Shared {
    pub(crate) state: Mutex<PoolState>,
    pub(crate) task_pushed: Condvar,
    pub(crate) completed: AtomicUsize,
    pub(crate) panicked: AtomicUsize,
}

impl Shared {
    pub(crate) fn new(worker_count: usize) -> Self {
        Self {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                terminating: false,
                mode: ShutdownMode::Drain,
                worker_states: vec![WorkerState::Idle; worker_count],
            }),
            task_pushed: Condvar::new(),
            completed: AtomicUsize::new(0),
            panicked: AtomicUsize::new(0),
        }
    }
}

/// Body of every worker thread
///
/// Takes items FIFO until the pool is terminating and either the queue is
/// empty or the shutdown mode is `Immediate`. The state lock is never held
/// while a work item runs.
pub(crate) fn worker_loop(index: usize, shared: &Shared) {
    loop {
        let work = {
            let mut state = recover_poisoned(shared.state.lock());
            state.worker_states[index] = WorkerState::Idle;
            loop {
                if state.terminating
                    && (state.queue.is_empty() || state.mode == ShutdownMode::Immediate)
                {
                    state.worker_states[index] = WorkerState::Stopped;
                    log::trace!("Worker {} stopped", index);
                    return;
                }
                if let Some(work) = state.queue.pop_front() {
                    state.worker_states[index] = WorkerState::Executing;
                    break work;
                }
                state = recover_poisoned(shared.task_pushed.wait(state));
            }
        };

        if panic::catch_unwind(AssertUnwindSafe(work)).is_err() {
            shared.panicked.fetch_add(1, Ordering::Relaxed);
            log::error!("Work item panicked on worker {}; worker continues", index);
        }
        shared.completed.fetch_add(1, Ordering::Relaxed);
    }
}

//! Scanner data types

use crate::scanner::digest::DigestAlgorithm;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One regular file to hash, produced by the enumerator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    absolute_path: PathBuf,
    relative_path: PathBuf,
}

impl FileTask {
    pub fn new(absolute_path: PathBuf, relative_path: PathBuf) -> Self {
        Self {
            absolute_path,
            relative_path,
        }
    }

    /// Path used for I/O and in the match log
    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Path relative to the scan root, for reporting
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }
}

/// Aggregate outcome of one scan
///
/// Every enumerated file lands in exactly one of `malware_files`,
/// `clean_files` or `digest_errors`. `errors` is the sum of traversal and
/// digest errors.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub total_files: usize,
    pub malware_files: usize,
    pub clean_files: usize,
    pub errors: usize,
    pub traversal_errors: usize,
    pub digest_errors: usize,
    pub log_write_errors: usize,
    pub workers: usize,
    /// Elapsed wall-clock time in seconds
    pub duration: f64,
}

/// Scanner settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanConfig {
    /// Worker threads; `None` uses the available hardware parallelism
    pub workers: Option<usize>,
    pub algorithm: DigestAlgorithm,
    /// Append to an existing match log instead of truncating it
    pub append_log: bool,
}

impl ScanConfig {
    /// Number of workers for a scan of `task_count` files
    ///
    /// Never more workers than tasks, never fewer than one.
    pub fn worker_count(&self, task_count: usize) -> usize {
        let requested = self.workers.filter(|n| *n > 0).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        requested.min(task_count).max(1)
    }
}

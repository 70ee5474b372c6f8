//! Scan orchestration: enumerate, fan out to the worker pool, fan in counters

use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::pool::{ShutdownMode, WorkerPool};
use crate::scanner::digest::{DigestFunction, FileDigester};
use crate::scanner::enumerator::DirectoryEnumerator;
use crate::scanner::error::{ScanError, ScannerResult};
use crate::scanner::logger::MatchLogger;
use crate::scanner::types::{FileTask, ScanConfig, ScanResult};
use crate::signatures::SignatureDatabase;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counters and log sink shared by every work item of one scan
///
/// Owned by the coordinator for the duration of the scan. Workers hold
/// clones of the `Arc`; the coordinator reads the counters only after the
/// pool has been drained and joined, which orders every increment before
/// the reads. Relaxed increments are sufficient for that reason.
#[derive(Debug)]
pub struct ScanSharedState {
    malware: AtomicUsize,
    clean: AtomicUsize,
    digest_errors: AtomicUsize,
    log_write_errors: AtomicUsize,
    logger: MatchLogger,
}

impl ScanSharedState {
    pub fn new(logger: MatchLogger) -> Self {
        Self {
            malware: AtomicUsize::new(0),
            clean: AtomicUsize::new(0),
            digest_errors: AtomicUsize::new(0),
            log_write_errors: AtomicUsize::new(0),
            logger,
        }
    }

    fn load(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::Relaxed)
    }
}

/// Signature scanner: a loaded database plus the machinery to scan a tree
pub struct Scanner {
    database: Arc<SignatureDatabase>,
    digester: Arc<dyn DigestFunction>,
    clock: Arc<dyn TimeProvider>,
    config: ScanConfig,
}

impl Scanner {
    /// Scanner with an empty database
    pub fn new(config: ScanConfig) -> Self {
        Self {
            database: Arc::new(SignatureDatabase::new()),
            digester: Arc::new(FileDigester::new(config.algorithm)),
            clock: Arc::new(SystemTimeProvider),
            config,
        }
    }

    pub fn with_database(mut self, database: SignatureDatabase) -> Self {
        self.database = Arc::new(database);
        self
    }

    /// Replace the digest function (the default hashes with `config.algorithm`)
    pub fn with_digest_function(mut self, digester: Arc<dyn DigestFunction>) -> Self {
        self.digester = digester;
        self
    }

    pub fn with_time_provider(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    /// Load the signature database, replacing any previously loaded one
    ///
    /// Returns the number of distinct signatures.
    pub fn load_database(&mut self, path: &Path) -> ScannerResult<usize> {
        let database = SignatureDatabase::load(path)?;
        let count = database.len();
        self.database = Arc::new(database);
        Ok(count)
    }

    pub fn database(&self) -> &SignatureDatabase {
        &self.database
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `root`, writing one line per match to the file at `log_path`
    ///
    /// The match log is opened before any work starts; failing to open it
    /// aborts the scan. Traversal and per-file errors are counted in the
    /// result, never returned.
    pub fn scan(&self, root: &Path, log_path: &Path) -> ScannerResult<ScanResult> {
        let started = self.clock.now();
        let logger = MatchLogger::open(log_path, self.config.append_log)?;
        self.run(root, logger, started)
    }

    /// Scan `root`, writing matches to an already opened logger
    pub fn scan_with_logger(&self, root: &Path, logger: MatchLogger) -> ScannerResult<ScanResult> {
        let started = self.clock.now();
        self.run(root, logger, started)
    }

    fn run(&self, root: &Path, logger: MatchLogger, started: Instant) -> ScannerResult<ScanResult> {
        log::info!(
            "Scanning {} with {} signatures ({})",
            root.display(),
            self.database.len(),
            self.config.algorithm
        );

        let enumeration = DirectoryEnumerator::new(root).enumerate();
        let tasks = enumeration.tasks;

        let mut result = ScanResult {
            total_files: tasks.len(),
            traversal_errors: enumeration.traversal_errors,
            errors: enumeration.traversal_errors,
            ..ScanResult::default()
        };

        if tasks.is_empty() {
            if let Err(e) = logger.flush() {
                log::error!("{}", e);
                result.log_write_errors += 1;
            }
            result.duration = self.elapsed_since(started);
            log::info!("No files to scan under {}", root.display());
            return Ok(result);
        }

        let workers = self.config.worker_count(tasks.len());
        let shared = Arc::new(ScanSharedState::new(logger));
        let pool = WorkerPool::new(workers)?;

        for task in tasks {
            let shared = Arc::clone(&shared);
            let database = Arc::clone(&self.database);
            let digester = Arc::clone(&self.digester);
            pool.submit(move || process_file(&task, &database, digester.as_ref(), &shared))?;
        }

        let report = pool.shutdown(ShutdownMode::Drain)?;
        if report.panicked > 0 {
            log::error!("{} work items panicked and were not counted", report.panicked);
        }

        if let Err(e) = shared.logger.flush() {
            log::error!("{}", e);
            shared.log_write_errors.fetch_add(1, Ordering::Relaxed);
        }

        result.malware_files = ScanSharedState::load(&shared.malware);
        result.clean_files = ScanSharedState::load(&shared.clean);
        result.digest_errors = ScanSharedState::load(&shared.digest_errors);
        result.log_write_errors = ScanSharedState::load(&shared.log_write_errors);
        result.errors = result.traversal_errors + result.digest_errors;
        result.workers = workers;
        result.duration = self.elapsed_since(started);

        log::info!(
            "Scan finished: {} files, {} matches, {} errors in {:.3}s",
            result.total_files,
            result.malware_files,
            result.errors,
            result.duration
        );
        Ok(result)
    }

    fn elapsed_since(&self, started: Instant) -> f64 {
        self.clock.now().duration_since(started).as_secs_f64()
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("signatures", &self.database.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Work item body: digest, look up, then exactly one of
/// {count match and log, count clean, count error}
fn process_file(
    task: &FileTask,
    database: &SignatureDatabase,
    digester: &dyn DigestFunction,
    shared: &ScanSharedState,
) {
    let digest = match guarded_digest(digester, task.absolute_path()) {
        Ok(digest) => digest,
        Err(e) => {
            shared.digest_errors.fetch_add(1, Ordering::Relaxed);
            log::warn!("{}", e);
            return;
        }
    };

    match database.lookup(&digest) {
        Some(verdict) => {
            shared.malware.fetch_add(1, Ordering::Relaxed);
            log::info!(
                "Match: {} ({}) {}",
                task.relative_path().display(),
                digest,
                verdict
            );
            if let Err(e) = shared.logger.record(task.absolute_path(), &digest, verdict) {
                shared.log_write_errors.fetch_add(1, Ordering::Relaxed);
                log::error!("{}", e);
            }
        }
        None => {
            shared.clean.fetch_add(1, Ordering::Relaxed);
            log::trace!("Clean: {} ({})", task.relative_path().display(), digest);
        }
    }
}

/// Run the digest function, turning a panic into a per-file digest error
fn guarded_digest(digester: &dyn DigestFunction, path: &Path) -> ScannerResult<String> {
    panic::catch_unwind(AssertUnwindSafe(|| digester.digest_file(path))).unwrap_or_else(
        |payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ScanError::DigestComputation {
                path: path.to_path_buf(),
                source: std::io::Error::other(format!("digest function panicked: {}", message)),
            })
        },
    )
}

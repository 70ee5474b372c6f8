//! Scanner Component
//!
//! Hashes every regular file below a root directory and reports files whose
//! digest is a known-bad signature.
//!
//! ## Pipeline
//!
//! - **DirectoryEnumerator**: materialises one `FileTask` per regular file,
//!   counting traversal errors instead of aborting
//! - **Scanner**: submits one work item per task to a `WorkerPool`, drains
//!   the pool and merges the shared counters into a `ScanResult`
//! - **DigestFunction**: streams the file through MD5 or SHA-256
//! - **MatchLogger**: appends `path;digest;verdict` lines under its own lock

pub mod api;
pub mod coordinator;
pub mod digest;
pub mod enumerator;
pub mod error;
pub mod logger;
pub mod types;

pub use coordinator::{ScanSharedState, Scanner};
pub use digest::{digest_bytes, DigestAlgorithm, DigestFunction, FileDigester};
pub use enumerator::{DirectoryEnumerator, Enumeration};
pub use error::{ScanError, ScannerResult};
pub use logger::{format_match_line, MatchLogger};
pub use types::{FileTask, ScanConfig, ScanResult};

#[cfg(test)]
mod tests;

//! Signature Database
//!
//! Maps known-bad file digests to verdict labels. The database is loaded once
//! from a `<digest>;<verdict>` line file before a scan starts and is read-only
//! for the lifetime of the scan.

pub mod database;
pub mod error;

pub use database::{parse_line, LoadStats, SignatureDatabase};
pub use error::{DatabaseError, DatabaseResult};

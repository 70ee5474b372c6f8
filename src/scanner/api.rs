//! Scanner API
//!
//! Public surface of the scanner for the CLI front end and integration
//! tests, in the same shape as the other domain `api` modules.

// Scan orchestration
pub use crate::scanner::coordinator::Scanner;

// Error handling
pub use crate::scanner::error::ScanError;

// Data types
pub use crate::scanner::digest::DigestAlgorithm;
pub use crate::scanner::types::{ScanConfig, ScanResult};

// Signature database
pub use crate::signatures::SignatureDatabase;

//! Test modules for the scanner system
//!
//! Covers scan outcomes against real temporary trees, the counter
//! invariants under concurrency, and worker count selection.

pub mod helpers;

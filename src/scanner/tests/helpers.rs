//! Test helper functions for scanner unit tests
//!
//! These helpers are separate from the integration test helpers in
//! tests/common/ since unit tests and integration tests run in different
//! contexts.

use crate::scanner::digest::{digest_bytes, DigestAlgorithm, DigestFunction, FileDigester};
use crate::scanner::error::{ScanError, ScannerResult};
use crate::signatures::SignatureDatabase;
use std::path::Path;
use tempfile::TempDir;

pub const MD5_EMPTY: &str = "d41d8cd98f00b204e9800998ecf8427e";
pub const MD5_HELLO: &str = "5d41402abc4b2a76b9719d911017c592";

/// Create a temporary tree from `(relative path, content)` pairs
pub fn tree_with(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (relative, content) in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write fixture file");
    }
    dir
}

/// Database containing the MD5 digest of each given content
pub fn database_for(entries: &[(&str, &str)]) -> SignatureDatabase {
    let mut database = SignatureDatabase::new();
    for (content, verdict) in entries {
        database.insert(&digest_bytes(DigestAlgorithm::Md5, content.as_bytes()), verdict);
    }
    database
}

/// Read the match log back as lines
pub fn log_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read match log")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Digest function that fails for any file whose name contains `marker`
pub struct FailingDigester {
    pub marker: &'static str,
    pub inner: FileDigester,
}

impl FailingDigester {
    pub fn new(marker: &'static str) -> Self {
        Self {
            marker,
            inner: FileDigester::default(),
        }
    }
}

impl DigestFunction for FailingDigester {
    fn digest_file(&self, path: &Path) -> ScannerResult<String> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if name.contains(self.marker) {
            return Err(ScanError::DigestComputation {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
            });
        }
        self.inner.digest_file(path)
    }
}

/// Digest function that panics for any file whose name contains `marker`
pub struct PanickingDigester {
    pub marker: &'static str,
}

impl DigestFunction for PanickingDigester {
    fn digest_file(&self, path: &Path) -> ScannerResult<String> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if name.contains(self.marker) {
            panic!("digest backend crashed on {}", name);
        }
        FileDigester::default().digest_file(path)
    }
}

//! Common test utilities and helpers
//!
//! Builds a scan fixture on disk: a signature database, a directory tree to
//! scan, and a location for the match log.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const MD5_EMPTY: &str = "d41d8cd98f00b204e9800998ecf8427e";
pub const MD5_HELLO: &str = "5d41402abc4b2a76b9719d911017c592";

/// Temporary scan workspace
///
/// Layout: `base.csv`, `tree/` (scan root), `matches.log`, `empty.toml`.
pub struct ScanFixture {
    dir: TempDir,
}

impl ScanFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(dir.path().join("tree")).expect("create scan root");
        std::fs::write(dir.path().join("empty.toml"), "").expect("write empty config");
        Self { dir }
    }

    /// Write the signature database from raw lines
    pub fn with_database(self, lines: &[&str]) -> Self {
        let mut contents = lines.join("\n");
        contents.push('\n');
        std::fs::write(self.base(), contents).expect("write database");
        self
    }

    /// Add a file under the scan root
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(path, content).expect("write fixture file");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn base(&self) -> PathBuf {
        self.dir.path().join("base.csv")
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("tree")
    }

    pub fn log(&self) -> PathBuf {
        self.dir.path().join("matches.log")
    }

    /// Config file with no settings, so a user's default config is never read
    pub fn empty_config(&self) -> PathBuf {
        self.dir.path().join("empty.toml")
    }

    pub fn log_lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.log())
            .expect("read match log")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Absolute path of a file under the scan root, as written to the log
    pub fn absolute(&self, relative: &str) -> PathBuf {
        std::path::absolute(self.root().join(relative)).expect("absolute path")
    }
}

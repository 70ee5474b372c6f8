//! In-memory digest → verdict mapping loaded from a `<digest>;<verdict>` file

use crate::signatures::error::{DatabaseError, DatabaseResult};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Field delimiter of the database line format
pub const FIELD_DELIMITER: char = ';';

/// Counters collected while loading a database source
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Well-formed records read (including duplicates)
    pub records: usize,
    /// Lines without a delimiter or with invalid UTF-8
    pub skipped: usize,
    /// Records that replaced an earlier record with the same digest
    pub duplicates: usize,
}

/// Known-bad digests with their verdict labels
///
/// Built once before scanning and never mutated afterwards, so it is shared
/// between workers behind an `Arc` without any lock.
#[derive(Debug, Default, Clone)]
pub struct SignatureDatabase {
    signatures: HashMap<String, String>,
    source: Option<PathBuf>,
    stats: LoadStats,
}

impl SignatureDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the database from a file
    ///
    /// Fails with [`DatabaseError::Unreadable`] if the file cannot be opened.
    /// Malformed lines are skipped.
    pub fn load(path: &Path) -> DatabaseResult<Self> {
        let file = File::open(path).map_err(|source| DatabaseError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut database = Self::from_reader(BufReader::new(file), path)?;
        database.source = Some(path.to_path_buf());

        log::info!(
            "Loaded {} signatures from {} ({} records, {} skipped, {} duplicates)",
            database.len(),
            path.display(),
            database.stats.records,
            database.stats.skipped,
            database.stats.duplicates
        );
        Ok(database)
    }

    /// Build a database from any line-oriented reader
    ///
    /// `origin` is only used for error messages.
    pub fn from_reader<R: BufRead>(mut reader: R, origin: &Path) -> DatabaseResult<Self> {
        let mut database = Self::new();
        let mut buffer = Vec::new();
        let mut line_number = 0;

        loop {
            buffer.clear();
            let read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|source| DatabaseError::Read {
                    path: origin.to_path_buf(),
                    line: line_number + 1,
                    source,
                })?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let Ok(line) = std::str::from_utf8(&buffer) else {
                log::debug!("Skipping non UTF-8 database line {}", line_number);
                database.stats.skipped += 1;
                continue;
            };
            let line = line.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }

            match parse_line(line) {
                Some((digest, verdict)) => {
                    database.stats.records += 1;
                    if database.insert(digest, verdict).is_some() {
                        database.stats.duplicates += 1;
                    }
                }
                None => {
                    log::debug!("Skipping malformed database line {}", line_number);
                    database.stats.skipped += 1;
                }
            }
        }

        Ok(database)
    }

    /// Add or replace a signature, returning the previous verdict if any
    pub fn insert(&mut self, digest: &str, verdict: &str) -> Option<String> {
        self.signatures
            .insert(digest.to_string(), verdict.to_string())
    }

    /// Verdict for a digest, if it is a known-bad digest
    pub fn lookup(&self, digest: &str) -> Option<&str> {
        self.signatures.get(digest).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// File this database was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn load_stats(&self) -> LoadStats {
        self.stats
    }
}

/// Split a database line into `(digest, verdict)` at the first delimiter
///
/// Returns `None` for lines without a delimiter. The verdict keeps any
/// further delimiters verbatim.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(FIELD_DELIMITER)
}

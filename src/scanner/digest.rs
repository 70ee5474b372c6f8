//! File digest computation
//!
//! A digest is the lowercase hex encoding of a hash over the whole file
//! content. MD5 is the default, matching the hashes published in most
//! signature feeds; SHA-256 is available for newer feeds.

use crate::scanner::error::{ScanError, ScannerResult};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

const READ_BUFFER_SIZE: usize = 8192;

/// Hash algorithm used to build file digests
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DigestAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    /// Length of the hex digest string
    pub fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 32,
            DigestAlgorithm::Sha256 => 64,
        }
    }
}

/// Computes the digest of a file's content
///
/// Implementations are shared by every worker and must be callable
/// concurrently.
pub trait DigestFunction: Send + Sync {
    fn digest_file(&self, path: &Path) -> ScannerResult<String>;
}

/// Streaming file digester for a fixed algorithm
#[derive(Debug, Default, Clone, Copy)]
pub struct FileDigester {
    algorithm: DigestAlgorithm,
}

impl FileDigester {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl DigestFunction for FileDigester {
    fn digest_file(&self, path: &Path) -> ScannerResult<String> {
        let mut context = DigestContext::open(path, self.algorithm)?;
        context.consume_to_end()?;
        Ok(context.finish())
    }
}

enum Hasher {
    Md5(md5::Context),
    Sha256(Sha256),
}

impl Hasher {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Md5 => Hasher::Md5(md5::Context::new()),
            DigestAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Md5(context) => context.consume(data),
            Hasher::Sha256(hasher) => hasher.update(data),
        }
    }

    fn finish(self) -> String {
        match self {
            Hasher::Md5(context) => format!("{:x}", context.compute()),
            Hasher::Sha256(hasher) => format!("{:x}", hasher.finalize()),
        }
    }
}

/// Scoped digest computation over one open file
///
/// Owns the file handle and the hasher state. Both are released when the
/// context is dropped, whether the digest completed or a read failed midway.
struct DigestContext {
    path: PathBuf,
    file: File,
    hasher: Hasher,
}

impl DigestContext {
    fn open(path: &Path, algorithm: DigestAlgorithm) -> ScannerResult<Self> {
        let file = File::open(path).map_err(|source| ScanError::DigestComputation {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            hasher: Hasher::new(algorithm),
        })
    }

    fn consume_to_end(&mut self) -> ScannerResult<()> {
        let mut buffer = [0u8; READ_BUFFER_SIZE];
        loop {
            match self.file.read(&mut buffer) {
                Ok(0) => return Ok(()),
                Ok(read) => self.hasher.update(&buffer[..read]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(ScanError::DigestComputation {
                        path: self.path.clone(),
                        source,
                    })
                }
            }
        }
    }

    fn finish(self) -> String {
        self.hasher.finish()
    }
}

/// Digest of an in-memory buffer
pub fn digest_bytes(algorithm: DigestAlgorithm, data: &[u8]) -> String {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    hasher.finish()
}

//! Recursive enumeration of the regular files below a scan root

use crate::scanner::error::ScanError;
use crate::scanner::types::FileTask;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Fully materialised enumeration of a scan root
#[derive(Debug, Default)]
pub struct Enumeration {
    pub tasks: Vec<FileTask>,
    pub traversal_errors: usize,
}

/// Walks a root directory and yields one [`FileTask`] per regular file
///
/// Directories, symlinks and special files are skipped. Symlinks below the
/// root are never followed, so every file is visited at most once.
#[derive(Debug, Clone)]
pub struct DirectoryEnumerator {
    root: PathBuf,
}

impl DirectoryEnumerator {
    pub fn new(root: &Path) -> Self {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        Self { root }
    }

    /// Absolute form of the scan root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walk the tree
    ///
    /// Traversal problems are yielded as `Err` items and do not end the walk;
    /// the siblings of an unreadable directory are still visited. A root
    /// that is missing or not a directory yields a single error.
    pub fn walk(&self) -> Box<dyn Iterator<Item = Result<FileTask, ScanError>> + '_> {
        match std::fs::metadata(&self.root) {
            Err(e) => {
                return Box::new(std::iter::once(Err(ScanError::Traversal {
                    path: self.root.clone(),
                    message: e.to_string(),
                })))
            }
            Ok(metadata) if !metadata.is_dir() => {
                return Box::new(std::iter::once(Err(ScanError::Traversal {
                    path: self.root.clone(),
                    message: "scan root is not a directory".to_string(),
                })))
            }
            Ok(_) => {}
        }

        let entries = WalkDir::new(&self.root).follow_links(false).into_iter();
        Box::new(entries.filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let relative = entry
                    .path()
                    .strip_prefix(&self.root)
                    .unwrap_or(entry.path())
                    .to_path_buf();
                Some(Ok(FileTask::new(entry.into_path(), relative)))
            }
            Ok(_) => None,
            Err(e) => Some(Err(ScanError::from(e))),
        }))
    }

    /// Walk the whole tree, collecting tasks and counting traversal errors
    pub fn enumerate(&self) -> Enumeration {
        let mut enumeration = Enumeration::default();

        for item in self.walk() {
            match item {
                Ok(task) => enumeration.tasks.push(task),
                Err(e) => {
                    log::warn!("{}", e);
                    enumeration.traversal_errors += 1;
                }
            }
        }

        log::debug!(
            "Enumerated {} files under {} ({} traversal errors)",
            enumeration.tasks.len(),
            self.root.display(),
            enumeration.traversal_errors
        );
        enumeration
    }
}

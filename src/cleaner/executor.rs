//! Deletes the files behind a single entry.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::scanner::{apparent_size, Entry};

/// Result of deleting one entry.
#[derive(Debug, Clone)]
pub enum DeleteResult {
    /// Everything the entry stood for is gone.
    Deleted { freed_bytes: u64 },
    /// Some paths could not be removed.
    Failed {
        /// Bytes this call removed; files that had already vanished don't count
        freed_bytes: u64,
        /// What is left of the entry, re-read from disk
        remaining: Option<Entry>,
        errors: Vec<(PathBuf, String)>,
    },
}

/// Options for the delete executor.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// If true, don't actually delete anything.
    pub dry_run: bool,
}

/// Executor for removing entries from disk.
pub struct DeleteExecutor {
    options: DeleteOptions,
}

impl DeleteExecutor {
    /// Create a new executor with the given options.
    pub fn new(options: DeleteOptions) -> Self {
        Self { options }
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Delete every file the entry owns, then the directory skeleton of a
    /// rollup once it is empty.
    ///
    /// A failure on one path doesn't stop the others; the entry is then
    /// rebuilt from what is still on disk.
    pub fn delete(&self, entry: &Entry) -> DeleteResult {
        if self.options.dry_run {
            return DeleteResult::Deleted {
                freed_bytes: entry.size_bytes,
            };
        }

        let mut errors = Vec::new();
        let mut removed_bytes = 0;

        for path in &entry.underlying_paths {
            let size = fs::symlink_metadata(path).map_or(0, |m| apparent_size(&m));
            match fs::remove_file(path) {
                Ok(()) => removed_bytes += size,
                Err(e) => errors.push((path.clone(), e.to_string())),
            }
        }

        if errors.is_empty() && entry.is_dir {
            match fs::remove_dir_all(&entry.path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => errors.push((entry.path.clone(), e.to_string())),
            }
        }

        if errors.is_empty() {
            return DeleteResult::Deleted {
                freed_bytes: entry.size_bytes,
            };
        }

        DeleteResult::Failed {
            freed_bytes: removed_bytes,
            remaining: entry.rederive(),
            errors,
        }
    }
}

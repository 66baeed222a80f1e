//! Sink for per-entry events during a scan or a trim.
//!
//! A reporter is created once by the caller and handed to [`crate::scanner::scan`]
//! and [`crate::cleaner::Trimmer::trim`]; nothing here is global.

use std::path::{Path, PathBuf};

use crate::scanner::{bytes_to_human, Entry};

/// Receives soft failures and deletions as they happen.
pub trait Reporter {
    /// A path below the root could not be read and was left out of the scan.
    fn entry_skipped(&mut self, path: &Path, error: &str);

    /// An entry was removed (or would have been, on a dry run).
    fn entry_deleted(&mut self, entry: &Entry, freed_bytes: u64, dry_run: bool);

    /// Removing one of an entry's paths failed.
    fn delete_failed(&mut self, entry: &Entry, path: &Path, error: &str);
}

/// Forwards events to `tracing`.
#[derive(Debug)]
pub struct TracingReporter {
    precision: u8,
}

impl TracingReporter {
    /// `precision` is the number of decimals used for sizes in messages.
    pub fn new(precision: u8) -> Self {
        Self { precision }
    }

    fn human(&self, bytes: u64) -> String {
        bytes_to_human(bytes, self.precision)
    }
}

impl Reporter for TracingReporter {
    fn entry_skipped(&mut self, path: &Path, error: &str) {
        tracing::warn!(path = %path.display(), "Skipping unreadable entry: {}", error);
    }

    fn entry_deleted(&mut self, entry: &Entry, freed_bytes: u64, dry_run: bool) {
        if dry_run {
            tracing::info!(name = %entry.name, "Would delete ({})", self.human(freed_bytes));
        } else {
            tracing::info!(name = %entry.name, "Deleted ({})", self.human(freed_bytes));
        }
    }

    fn delete_failed(&mut self, entry: &Entry, path: &Path, error: &str) {
        tracing::warn!(
            name = %entry.name,
            path = %path.display(),
            "Failed to delete: {}",
            error
        );
    }
}

/// An event recorded by [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Skipped { path: PathBuf, error: String },
    Deleted { name: String, freed_bytes: u64, dry_run: bool },
    DeleteFailed { name: String, path: PathBuf, error: String },
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub events: Vec<ReportEvent>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipped(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ReportEvent::Skipped { .. }))
            .count()
    }

    pub fn deleted_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Deleted { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn entry_skipped(&mut self, path: &Path, error: &str) {
        self.events.push(ReportEvent::Skipped {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    fn entry_deleted(&mut self, entry: &Entry, freed_bytes: u64, dry_run: bool) {
        self.events.push(ReportEvent::Deleted {
            name: entry.name.clone(),
            freed_bytes,
            dry_run,
        });
    }

    fn delete_failed(&mut self, entry: &Entry, path: &Path, error: &str) {
        self.events.push(ReportEvent::DeleteFailed {
            name: entry.name.clone(),
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }
}

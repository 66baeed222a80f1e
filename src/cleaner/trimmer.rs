//! Trim a scanned tree down to a target size.

use std::path::PathBuf;

use crate::error::{DirtError, Result};
use crate::report::Reporter;
use crate::scanner::{human_to_bytes, Entry};

use super::executor::{DeleteExecutor, DeleteOptions, DeleteResult};

/// Options for trimming.
#[derive(Debug, Clone, Default)]
pub struct TrimOptions {
    /// Report what would be deleted without touching the disk.
    pub dry_run: bool,
}

/// One path that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub entry_name: String,
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a trim.
#[derive(Debug, Clone, Default)]
pub struct TrimReport {
    /// Entries still on disk, in the original order
    pub survivors: Vec<Entry>,
    /// Entries removed in full
    pub deleted: Vec<Entry>,
    /// Bytes removed by this trim, including files removed from entries
    /// that could only be partially deleted
    pub deleted_size: u64,
    /// Number of entries removed in full
    pub deleted_count: usize,
    /// Size of what is left
    pub remaining_size: u64,
    /// Target in bytes
    pub target: u64,
    /// Paths that could not be removed
    pub failures: Vec<DeleteFailure>,
    pub dry_run: bool,
}

/// Decode a `--trim-down` value.
///
/// A value made only of digits is refused: it's more likely a forgotten
/// unit than a byte count, and reading it as bytes would delete far more
/// than intended.
pub fn parse_target(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(DirtError::AmbiguousSize(text.to_string()));
    }
    Ok(human_to_bytes(trimmed)?)
}

/// Deletes entries in the order given until the remaining size fits the target.
pub struct Trimmer {
    executor: DeleteExecutor,
}

impl Trimmer {
    pub fn new(options: TrimOptions) -> Self {
        Self {
            executor: DeleteExecutor::new(DeleteOptions {
                dry_run: options.dry_run,
            }),
        }
    }

    /// Validate `target` and trim `entries` down to it.
    ///
    /// Nothing is deleted if the target is rejected.
    pub fn trim(
        &self,
        entries: Vec<Entry>,
        target: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<TrimReport> {
        let target = parse_target(target)?;
        Ok(self.trim_to(entries, target, reporter))
    }

    /// Walk `entries` in order, deleting each whole entry while the remaining
    /// total is still above `target`.
    ///
    /// Deletion works on whole entries, so the result may end up below the
    /// target by up to one entry's size.
    pub fn trim_to(
        &self,
        entries: Vec<Entry>,
        target: u64,
        reporter: &mut dyn Reporter,
    ) -> TrimReport {
        let dry_run = self.executor.is_dry_run();
        let mut report = TrimReport {
            remaining_size: entries.iter().map(|e| e.size_bytes).sum(),
            target,
            dry_run,
            ..Default::default()
        };

        let mut pending = entries.into_iter();
        for entry in pending.by_ref() {
            if report.remaining_size <= target {
                report.survivors.push(entry);
                break;
            }

            match self.executor.delete(&entry) {
                DeleteResult::Deleted { freed_bytes } => {
                    report.remaining_size = report.remaining_size.saturating_sub(freed_bytes);
                    report.deleted_size += freed_bytes;
                    reporter.entry_deleted(&entry, freed_bytes, dry_run);
                    report.deleted.push(entry);
                }
                DeleteResult::Failed {
                    freed_bytes,
                    remaining,
                    errors,
                } => {
                    // Bytes that vanished on their own leave the total too,
                    // but only what was removed here counts as deleted.
                    let left = remaining.as_ref().map_or(0, |e| e.size_bytes);
                    let gone = entry.size_bytes.saturating_sub(left);
                    report.remaining_size = report.remaining_size.saturating_sub(gone);
                    report.deleted_size += freed_bytes;
                    for (path, error) in errors {
                        reporter.delete_failed(&entry, &path, &error);
                        report.failures.push(DeleteFailure {
                            entry_name: entry.name.clone(),
                            path,
                            error,
                        });
                    }
                    if let Some(rest) = remaining {
                        report.survivors.push(rest);
                    }
                }
            }
        }
        report.survivors.extend(pending);
        report.deleted_count = report.deleted.len();

        tracing::debug!(
            deleted = report.deleted_count,
            deleted_size = report.deleted_size,
            remaining = report.survivors.len(),
            remaining_size = report.remaining_size,
            failures = report.failures.len(),
            "Trim finished"
        );

        report
    }
}

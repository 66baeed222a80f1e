use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use super::tree::{Aggregate, FileStat};

/// One row of a scan result: a single file, or a directory rolled up into
/// one aggregated row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Path relative to the scan root
    pub name: String,

    /// Absolute path of the file or directory
    #[serde(skip)]
    pub path: PathBuf,

    /// True if this row is a directory rollup
    pub is_dir: bool,

    /// Apparent size in bytes (sum of file sizes for a rollup)
    #[serde(rename = "size")]
    pub size_bytes: u64,

    /// Number of files (1 for files, recursive count for rollups)
    pub num_of_files: u64,

    /// Level at which the row was materialized, 0 = direct child of the root
    pub depth: usize,

    /// Access/modify/change times in unix seconds, most recent file for rollups
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,

    /// Files this row stands for. Only used when deleting.
    #[serde(skip)]
    pub underlying_paths: Vec<PathBuf>,
}

impl Entry {
    pub fn file(name: String, path: PathBuf, depth: usize, stat: &FileStat) -> Self {
        Self {
            name,
            underlying_paths: vec![path.clone()],
            path,
            is_dir: false,
            size_bytes: stat.size,
            num_of_files: 1,
            depth,
            atime: stat.atime,
            mtime: stat.mtime,
            ctime: stat.ctime,
        }
    }

    pub fn rollup(
        name: String,
        path: PathBuf,
        depth: usize,
        aggregate: &Aggregate,
        own: &FileStat,
        underlying_paths: Vec<PathBuf>,
    ) -> Self {
        let (atime, mtime, ctime) = aggregate.times_or(own);
        Self {
            name,
            path,
            is_dir: true,
            size_bytes: aggregate.size,
            num_of_files: aggregate.files,
            depth,
            atime,
            mtime,
            ctime,
            underlying_paths,
        }
    }

    /// Build a fresh row from whatever is still on disk.
    ///
    /// Returns `None` once nothing this row stood for exists anymore.
    pub fn rederive(&self) -> Option<Entry> {
        if self.underlying_paths.is_empty() {
            // Empty directory rollup: it survives as long as the directory does.
            return fs::symlink_metadata(&self.path).ok().map(|_| self.clone());
        }

        let mut aggregate = Aggregate::default();
        let mut remaining = Vec::new();
        for path in &self.underlying_paths {
            if let Ok(metadata) = fs::symlink_metadata(path) {
                aggregate.add_file(&FileStat::from_metadata(&metadata));
                remaining.push(path.clone());
            }
        }

        if remaining.is_empty() {
            return None;
        }

        let own = FileStat {
            size: 0,
            atime: self.atime,
            mtime: self.mtime,
            ctime: self.ctime,
        };
        let (atime, mtime, ctime) = aggregate.times_or(&own);

        Some(Entry {
            name: self.name.clone(),
            path: self.path.clone(),
            is_dir: self.is_dir,
            size_bytes: aggregate.size,
            num_of_files: aggregate.files,
            depth: self.depth,
            atime,
            mtime,
            ctime,
            underlying_paths: remaining,
        })
    }
}

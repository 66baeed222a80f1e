use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::error::{DirtError, Result};
use crate::report::Reporter;

use super::entry::Entry;
use super::options::ScanOptions;
use super::tree::{FileStat, ScanTree};

/// Everything a single scan pass produced.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Canonical root that was scanned
    pub root: PathBuf,
    /// Rows in scan order (sorted by file name at every level)
    pub entries: Vec<Entry>,
    /// Sum of all row sizes
    pub total_size: u64,
    /// Number of rows
    pub total_entries: usize,
    /// Paths that could not be read and were left out
    pub skipped: usize,
    /// Wall-clock time of the scan
    pub elapsed: Duration,
}

fn path_error(path: &Path, source: io::Error) -> DirtError {
    DirtError::PathError {
        path: path.to_path_buf(),
        source,
    }
}

/// Scan `root` and return its contents as rows.
///
/// The root itself must be a readable directory. Anything below it that
/// can't be read is skipped, counted, and handed to `reporter`.
pub fn scan(root: &Path, options: &ScanOptions, reporter: &mut dyn Reporter) -> Result<ScanResult> {
    options.validate()?;
    let started = Instant::now();

    let root = root.canonicalize().map_err(|e| path_error(root, e))?;
    let metadata = fs::metadata(&root).map_err(|e| path_error(&root, e))?;
    if !metadata.is_dir() {
        return Err(path_error(&root, io::Error::other("not a directory")));
    }
    // Opening it up front turns an unreadable root into a hard error instead
    // of a skipped entry.
    fs::read_dir(&root).map_err(|e| path_error(&root, e))?;

    tracing::debug!(root = %root.display(), max_depth = options.max_depth, "Scanning initialised");

    let mut tree = ScanTree::new(root.clone(), FileStat::from_metadata(&metadata));
    let mut skipped = 0;

    let walker = WalkDir::new(&root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(options.skip_virtual_fs && ScanOptions::is_linux_virtual_fs(e.path())));

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                skipped += 1;
                let path = err.path().unwrap_or(root.as_path()).to_path_buf();
                reporter.entry_skipped(&path, &err.to_string());
                continue;
            }
        };

        // Not following links, so this is lstat: symlinks stay leaves.
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                skipped += 1;
                reporter.entry_skipped(entry.path(), &err.to_string());
                continue;
            }
        };

        let path = entry.into_path();
        let stat = FileStat::from_metadata(&metadata);
        if metadata.is_dir() {
            tree.insert_dir(path, stat);
        } else {
            tree.insert_file(path, stat);
        }
    }

    let entries = tree.materialize(options.max_depth);
    let total_size = entries.iter().map(|e| e.size_bytes).sum();
    let elapsed = started.elapsed();

    tracing::debug!(
        entries = entries.len(),
        total_size,
        skipped,
        elapsed_ms = elapsed.as_millis() as u64,
        "Scanning completed"
    );

    Ok(ScanResult {
        root,
        total_entries: entries.len(),
        entries,
        total_size,
        skipped,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReporter;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(path: &Path, len: usize) {
        File::create(path)
            .unwrap()
            .write_all(&vec![b'x'; len])
            .unwrap();
    }

    fn scan_with_depth(root: &Path, depth: usize) -> ScanResult {
        let mut reporter = CollectingReporter::new();
        scan(root, &ScanOptions::new().with_max_depth(depth), &mut reporter).unwrap()
    }

    #[test]
    fn test_scan_single_file() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("only.txt"), 10);

        let result = scan_with_depth(dir.path(), 0);

        assert_eq!(result.entries.len(), 1);
        let entry = &result.entries[0];
        assert_eq!(entry.name, "only.txt");
        assert_eq!(entry.size_bytes, 10);
        assert_eq!(entry.num_of_files, 1);
        assert_eq!(entry.depth, 0);
        assert_eq!(result.total_size, 10);
        assert_eq!(result.total_entries, 1);
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_scan_reports_root_and_elapsed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(&dir.path().join("sub/f"), 3);

        // A path going through ".." resolves to the canonical root.
        let result = scan_with_depth(&dir.path().join("sub/.."), 0);

        assert_eq!(result.root, dir.path().canonicalize().unwrap());
        assert!(result.elapsed > Duration::ZERO);
    }

    #[test]
    fn test_scan_rolls_up_subdirectory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(&root.join("file.txt"), 5);
        fs::create_dir(root.join("sub")).unwrap();
        write_file(&root.join("sub/a"), 3);
        write_file(&root.join("sub/b"), 4);

        let result = scan_with_depth(root, 0);

        assert_eq!(result.entries.len(), 2);
        let file = result.entries.iter().find(|e| e.name == "file.txt").unwrap();
        let sub = result.entries.iter().find(|e| e.name == "sub").unwrap();
        assert_eq!(file.size_bytes, 5);
        assert_eq!(file.depth, 0);
        assert_eq!(sub.size_bytes, 7);
        assert_eq!(sub.num_of_files, 2);
        assert_eq!(sub.depth, 0);
        assert!(sub.is_dir);
        assert_eq!(result.total_size, 12);
    }

    #[test]
    fn test_scan_depth_expands_levels() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("genre/artist")).unwrap();
        write_file(&root.join("genre/artist/song.mp3"), 100);
        write_file(&root.join("genre/artist/other.mp3"), 50);
        write_file(&root.join("genre/loose.mp3"), 7);

        let names = |result: &ScanResult| -> Vec<String> {
            result.entries.iter().map(|e| e.name.clone()).collect()
        };

        let depth0 = scan_with_depth(root, 0);
        assert_eq!(names(&depth0), vec!["genre"]);

        let depth1 = scan_with_depth(root, 1);
        assert_eq!(names(&depth1), vec!["genre/artist", "genre/loose.mp3"]);
        assert!(depth1.entries.iter().all(|e| e.depth == 1));

        let depth2 = scan_with_depth(root, 2);
        assert_eq!(
            names(&depth2),
            vec![
                "genre/artist/other.mp3",
                "genre/artist/song.mp3",
                "genre/loose.mp3"
            ]
        );
        assert_eq!(depth2.entries[0].depth, 2);
        assert_eq!(depth2.entries[2].depth, 1);

        for result in [&depth0, &depth1, &depth2] {
            assert_eq!(result.total_size, 157);
        }
    }

    #[test]
    fn test_scan_rollup_times_are_latest_file() {
        use std::fs::{FileTimes, OpenOptions};
        use std::time::{Duration, SystemTime};

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("d")).unwrap();
        write_file(&root.join("d/old"), 1);
        write_file(&root.join("d/new"), 1);

        let set = |name: &str, secs: u64| {
            let t = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
            OpenOptions::new()
                .write(true)
                .open(root.join(name))
                .unwrap()
                .set_times(FileTimes::new().set_accessed(t).set_modified(t))
                .unwrap();
        };
        set("d/old", 1_000_000);
        set("d/new", 2_000_000);

        let result = scan_with_depth(root, 0);
        let d = &result.entries[0];
        assert_eq!(d.atime, 2_000_000);
        assert_eq!(d.mtime, 2_000_000);
    }

    #[test]
    fn test_scan_does_not_follow_directory_symlinks() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("real")).unwrap();
        write_file(&root.join("real/data"), 1000);
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();
        // A cycle back to the root must not hang the scan.
        std::os::unix::fs::symlink(root, root.join("real/loop")).unwrap();

        let result = scan_with_depth(root, 2);

        let link = result.entries.iter().find(|e| e.name == "link").unwrap();
        assert!(!link.is_dir);
        assert_eq!(link.num_of_files, 1);
        assert!(link.size_bytes < 1000);
    }

    #[test]
    fn test_scan_nonexistent_path() {
        let mut reporter = CollectingReporter::new();
        let result = scan(
            Path::new("/nonexistent/path/12345"),
            &ScanOptions::default(),
            &mut reporter,
        );
        assert!(matches!(result, Err(DirtError::PathError { .. })));
    }

    #[test]
    fn test_scan_file_as_root_is_path_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f");
        write_file(&file, 1);

        let mut reporter = CollectingReporter::new();
        let result = scan(&file, &ScanOptions::default(), &mut reporter);
        assert!(matches!(result, Err(DirtError::PathError { .. })));
    }

    #[test]
    fn test_scan_rejects_depth_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut reporter = CollectingReporter::new();
        let result = scan(dir.path(), &ScanOptions::new().with_max_depth(5), &mut reporter);
        assert!(matches!(result, Err(DirtError::InvalidArgument(_))));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = scan_with_depth(dir.path(), 0);
        assert!(result.entries.is_empty());
        assert_eq!(result.total_size, 0);
    }

    #[test]
    fn test_scan_skips_unreadable_subdirectory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("locked")).unwrap();
        write_file(&root.join("locked/secret"), 10);
        write_file(&root.join("open.txt"), 3);
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000)).unwrap();

        // Root can read anything; nothing to observe in that case.
        let readable_anyway = fs::read_dir(root.join("locked")).is_ok();

        let mut reporter = CollectingReporter::new();
        let result = scan(root, &ScanOptions::default(), &mut reporter);

        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();

        let result = result.unwrap();
        assert!(result.entries.iter().any(|e| e.name == "open.txt"));
        if !readable_anyway {
            assert_eq!(result.skipped, 1);
            assert_eq!(reporter.skipped(), 1);
            let locked = result.entries.iter().find(|e| e.name == "locked").unwrap();
            assert_eq!(locked.size_bytes, 0);
        }
    }
}

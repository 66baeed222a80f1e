use std::path::Path;

use crate::error::{DirtError, Result};

/// Deepest level that can be materialized as separate rows.
pub const MAX_DEPTH: usize = 2;

/// Linux virtual filesystem paths that should be excluded by default.
/// These can report incorrect/huge sizes and cause scanning issues.
pub const LINUX_VIRTUAL_FS_PATHS: &[&str] = &["/proc", "/dev", "/sys", "/run"];

/// Configuration options for a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Levels below the root materialized as separate rows (0 = only direct children)
    pub max_depth: usize,

    /// Don't descend into /proc, /dev, /sys and /run when they show up below the root
    pub skip_virtual_fs: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: 0,
            skip_virtual_fs: true,
        }
    }
}

impl ScanOptions {
    /// Check if a path is one of the Linux virtual filesystem mount points
    pub fn is_linux_virtual_fs(path: &Path) -> bool {
        LINUX_VIRTUAL_FS_PATHS
            .iter()
            .any(|vfs| path == Path::new(vfs))
    }

    /// Create a new ScanOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum materialized depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set whether virtual filesystems are skipped
    pub fn with_skip_virtual_fs(mut self, skip: bool) -> Self {
        self.skip_virtual_fs = skip;
        self
    }

    /// Reject options that can't be scanned with.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_DEPTH {
            return Err(DirtError::InvalidArgument(format!(
                "depth must be between 0 and {}, {} given",
                MAX_DEPTH, self.max_depth
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ScanOptions::default();
        assert_eq!(opts.max_depth, 0);
        assert!(opts.skip_virtual_fs);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_scan_options_builder() {
        let opts = ScanOptions::new()
            .with_max_depth(2)
            .with_skip_virtual_fs(false);

        assert_eq!(opts.max_depth, 2);
        assert!(!opts.skip_virtual_fs);
    }

    #[test]
    fn test_depth_out_of_range_is_rejected() {
        let err = ScanOptions::new().with_max_depth(3).validate().unwrap_err();
        assert!(matches!(err, DirtError::InvalidArgument(_)));
    }

    #[test]
    fn test_is_linux_virtual_fs() {
        assert!(ScanOptions::is_linux_virtual_fs(Path::new("/proc")));
        assert!(ScanOptions::is_linux_virtual_fs(Path::new("/dev")));
        assert!(ScanOptions::is_linux_virtual_fs(Path::new("/sys")));
        assert!(ScanOptions::is_linux_virtual_fs(Path::new("/run")));

        // Only the mount points themselves, so scanning inside them still works
        assert!(!ScanOptions::is_linux_virtual_fs(Path::new("/proc/1")));
        assert!(!ScanOptions::is_linux_virtual_fs(Path::new("/running")));
        assert!(!ScanOptions::is_linux_virtual_fs(Path::new("/home")));
        assert!(!ScanOptions::is_linux_virtual_fs(Path::new("/tmp")));
    }
}

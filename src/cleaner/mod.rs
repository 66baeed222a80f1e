//! Size-based cleanup of scanned entries.

pub mod executor;
pub mod trimmer;

pub use executor::{DeleteExecutor, DeleteOptions, DeleteResult};
pub use trimmer::{parse_target, DeleteFailure, TrimOptions, TrimReport, Trimmer};

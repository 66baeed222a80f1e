mod entry;
mod options;
mod size;
mod sort;
mod tree;
mod walker;

pub use entry::Entry;
pub use options::{ScanOptions, MAX_DEPTH};
pub use size::{apparent_size, bytes_to_human, human_to_bytes, SizeParseError, MAX_PRECISION};
pub use sort::{sort_entries, SortBy, SortDirection, SortKey};
pub use tree::{Aggregate, FileStat, NodeId, ScanTree};
pub use walker::{scan, ScanResult};

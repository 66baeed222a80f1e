//! Rendering of scan results: tables, CSV, JSON and summary lines.

mod format;
mod render;
mod summary;

pub use format::{OutputFormat, TableStyle};
pub use render::{
    format_timestamp, is_valid_time_format, render, row_cells, RenderOptions,
    DEFAULT_TIME_FORMAT, HEADERS,
};
pub use summary::{failure_summary, format_elapsed, listing_summary, trim_summary};

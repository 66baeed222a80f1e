//! dirt - directory usage listing and size-based cleanup
//!
//! This crate provides functionality for:
//! - Scanning a directory into rows, rolling deep contents up into their parent
//! - Sorting and rendering rows as tables, CSV or JSON
//! - Deleting rows in sort order until the directory fits a size target

pub mod cleaner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod scanner;

// Re-export commonly used types
pub use config::Config;
pub use error::{DirtError, Result};

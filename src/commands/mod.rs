//! Command implementations: a plain listing, or a listing after trimming.

pub mod list;
pub mod trim;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{DirtError, Result};
use crate::output::{OutputFormat, RenderOptions};
use crate::report::Reporter;
use crate::scanner::{ScanOptions, SortBy};

/// Settings for one run, CLI flags layered over the config file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub path: PathBuf,
    pub sort_by: SortBy,
    pub output: OutputFormat,
    pub depth: usize,
    pub render: RenderOptions,
    pub trim_down: Option<String>,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let listing = &config.listing;

        let options = Self {
            path: cli.path.clone(),
            sort_by: cli.sortby.unwrap_or(listing.sort_by),
            output: cli.output.unwrap_or(listing.output),
            depth: cli.depth.unwrap_or(listing.depth) as usize,
            render: RenderOptions {
                human: listing.human && !cli.nohuman,
                precision: cli.precision.unwrap_or(listing.precision),
                time_format: listing.time_format.clone(),
            },
            trim_down: cli.trim_down.clone(),
            dry_run: cli.dry_run || config.trim.dry_run,
        };

        options.scan_options().validate()?;
        Ok(options)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new().with_max_depth(self.depth)
    }
}

/// Run the trim command when a target is set, the list command otherwise.
pub fn run(options: &RunOptions, reporter: &mut dyn Reporter) -> Result<()> {
    match options.trim_down.as_deref() {
        Some(target) => trim::run(options, target, reporter),
        None => list::run(options, reporter),
    }
}

/// Write `text` plus a newline to stdout.
pub(crate) fn print_stdout(text: &str) -> Result<()> {
    let stdout = std::io::stdout();
    write_line(&mut stdout.lock(), Path::new("<stdout>"), text)
}

/// Write `text` plus a newline to `out`, naming `target` in the error.
fn write_line(out: &mut dyn Write, target: &Path, text: &str) -> Result<()> {
    writeln!(out, "{}", text)
        .and_then(|()| out.flush())
        .map_err(|source| DirtError::Io {
            path: target.to_path_buf(),
            source,
        })
}

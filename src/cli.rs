use clap::Parser;
use clap_complete::Shell;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::scanner::SortBy;

/// dirt - list what takes up space in a directory, and trim it down
#[derive(Parser, Debug)]
#[command(name = "dirt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to analyze
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Sort order: <name|size|depth|num_of_files|atime|mtime|ctime>_<asc|desc>
    #[arg(short, long = "sortby", value_name = "KEY_DIR")]
    pub sortby: Option<SortBy>,

    /// Output format: csv, json, simple, plain, grid, fancy_grid, github, rounded
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Decimal digits of human-readable sizes
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=11))]
    pub precision: Option<u8>,

    /// Directory levels listed as separate rows
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=2))]
    pub depth: Option<u8>,

    /// Print raw bytes and unix timestamps (also accepted as -nh)
    #[arg(long)]
    pub nohuman: bool,

    /// Delete entries, in sort order, until the total is at most SIZE (e.g. 900mb)
    #[arg(long, value_name = "SIZE")]
    pub trim_down: Option<String>,

    /// With --trim-down, report what would be deleted without deleting
    #[arg(short = 'n', long, requires = "trim_down")]
    pub dry_run: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Rewrite the two-letter `-nh` short form to `--nohuman`.
///
/// Arguments after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                arg
            } else if arg == "-nh" {
                OsString::from("--nohuman")
            } else {
                arg
            }
        })
        .collect()
}

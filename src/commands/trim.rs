//! Trim command implementation

use std::time::Instant;

use crate::cleaner::{parse_target, TrimOptions, Trimmer};
use crate::error::Result;
use crate::output::{failure_summary, render, trim_summary};
use crate::report::Reporter;
use crate::scanner::{bytes_to_human, scan, sort_entries};

use super::{print_stdout, RunOptions};

/// Delete entries in sort order until the total fits `target`, then print
/// what is left.
pub fn run(options: &RunOptions, target: &str, reporter: &mut dyn Reporter) -> Result<()> {
    let started = Instant::now();

    // Reject the target before anything is scanned or touched.
    let target = parse_target(target)?;

    tracing::info!(
        path = %options.path.display(),
        sort_by = %options.sort_by,
        target = %bytes_to_human(target, options.render.precision),
        dry_run = options.dry_run,
        "Trimming directory"
    );

    let mut result = scan(&options.path, &options.scan_options(), reporter)?;
    sort_entries(&mut result.entries, options.sort_by);

    let trimmer = Trimmer::new(TrimOptions {
        dry_run: options.dry_run,
    });
    let report = trimmer.trim_to(result.entries, target, reporter);

    let table = render(&report.survivors, options.output, &options.render)?;
    print_stdout(&table)?;

    for line in trim_summary(&report, started.elapsed(), options.render.precision) {
        eprintln!("{}", line);
    }
    for line in failure_summary(result.skipped, Some(&report)) {
        eprintln!("{}", line);
    }

    Ok(())
}

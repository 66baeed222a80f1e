//! List command implementation

use crate::error::Result;
use crate::output::{failure_summary, listing_summary, render};
use crate::report::Reporter;
use crate::scanner::{scan, sort_entries};

use super::{print_stdout, RunOptions};

/// Scan, sort and print the rows, then the summary line.
pub fn run(options: &RunOptions, reporter: &mut dyn Reporter) -> Result<()> {
    tracing::info!(path = %options.path.display(), sort_by = %options.sort_by, "Listing directory");

    let mut result = scan(&options.path, &options.scan_options(), reporter)?;
    sort_entries(&mut result.entries, options.sort_by);
    tracing::debug!(
        root = %result.root.display(),
        entries = result.total_entries,
        "Listing scanned root"
    );

    let table = render(&result.entries, options.output, &options.render)?;
    print_stdout(&table)?;
    print_stdout(&listing_summary(
        result.total_entries,
        result.total_size,
        result.elapsed,
        options.render.precision,
    ))?;

    for line in failure_summary(result.skipped, None) {
        eprintln!("{}", line);
    }

    Ok(())
}

use std::collections::HashSet;
use std::time::Duration;

use crate::cleaner::TrimReport;
use crate::scanner::bytes_to_human;

fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, plural)
    }
}

/// Elapsed time in seconds, millisecond resolution.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    let unit = if (secs - 1.0).abs() < 0.0005 {
        "second"
    } else {
        "seconds"
    };
    format!("{:.3} {}", secs, unit)
}

/// Line printed after a listing.
pub fn listing_summary(items: usize, total_size: u64, elapsed: Duration, precision: u8) -> String {
    format!(
        "{} with total of {} data; took {}.",
        count(items, "item", "items"),
        bytes_to_human(total_size, precision),
        format_elapsed(elapsed)
    )
}

/// Lines printed after a trim: what went, then what is left.
pub fn trim_summary(report: &TrimReport, elapsed: Duration, precision: u8) -> Vec<String> {
    let deleted = count(report.deleted_count, "item", "items");
    let deleted_size = bytes_to_human(report.deleted_size, precision);

    let first = if report.dry_run {
        format!(
            "[DRY RUN] {} with total of {} data would be deleted.",
            deleted, deleted_size
        )
    } else {
        format!(
            "{} with total of {} data has been deleted.",
            deleted, deleted_size
        )
    };

    vec![
        first,
        format!(
            "Currently {} left with {} of data; took {}.",
            count(report.survivors.len(), "item", "items"),
            bytes_to_human(report.remaining_size, precision),
            format_elapsed(elapsed)
        ),
    ]
}

/// Soft failure lines, empty when nothing went wrong.
pub fn failure_summary(skipped: usize, report: Option<&TrimReport>) -> Vec<String> {
    let mut lines = Vec::new();

    if skipped > 0 {
        lines.push(format!(
            "{} could not be read.",
            count(skipped, "entry", "entries")
        ));
    }

    if let Some(report) = report {
        let failed: HashSet<&str> = report
            .failures
            .iter()
            .map(|f| f.entry_name.as_str())
            .collect();
        if !failed.is_empty() {
            lines.push(format!(
                "{} could not be deleted.",
                count(failed.len(), "entry", "entries")
            ));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::DeleteFailure;
    use std::path::PathBuf;

    #[test]
    fn test_listing_summary() {
        let line = listing_summary(3, 1536, Duration::from_millis(1234), 2);
        assert_eq!(line, "3 items with total of 1.5 KB data; took 1.234 seconds.");

        let line = listing_summary(1, 10, Duration::from_secs(1), 2);
        assert_eq!(line, "1 item with total of 10 B data; took 1.000 second.");
    }

    #[test]
    fn test_trim_summary() {
        let report = TrimReport {
            deleted_count: 3,
            deleted_size: 60,
            remaining_size: 40,
            ..Default::default()
        };

        let lines = trim_summary(&report, Duration::from_millis(5), 2);
        assert_eq!(lines[0], "3 items with total of 60 B data has been deleted.");
        assert_eq!(
            lines[1],
            "Currently 0 items left with 40 B of data; took 0.005 seconds."
        );
    }

    #[test]
    fn test_trim_summary_dry_run() {
        let report = TrimReport {
            deleted_count: 1,
            deleted_size: 2048,
            dry_run: true,
            ..Default::default()
        };

        let lines = trim_summary(&report, Duration::ZERO, 2);
        assert!(lines[0].starts_with("[DRY RUN] 1 item with total of 2 KB"));
        assert!(lines[0].contains("would be deleted"));
    }

    #[test]
    fn test_failure_summary_counts_entries_once() {
        let failure = |name: &str, path: &str| DeleteFailure {
            entry_name: name.to_string(),
            path: PathBuf::from(path),
            error: "Permission denied".to_string(),
        };
        let report = TrimReport {
            failures: vec![failure("a", "/r/a/1"), failure("a", "/r/a/2"), failure("b", "/r/b")],
            ..Default::default()
        };

        let lines = failure_summary(1, Some(&report));
        assert_eq!(lines, vec!["1 entry could not be read.", "2 entries could not be deleted."]);

        assert!(failure_summary(0, None).is_empty());
    }
}

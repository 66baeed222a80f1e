use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use comfy_table::{presets, CellAlignment, Table};
use csv::{QuoteStyle, WriterBuilder};
use serde_json::{json, Value};

use crate::error::{DirtError, Result};
use crate::scanner::{bytes_to_human, Entry};

use super::format::{OutputFormat, TableStyle};

/// Column titles, in output order.
pub const HEADERS: [&str; 7] = [
    "Name",
    "Size",
    "Depth",
    "Files",
    "Access Time",
    "Modify Time",
    "Change Time",
];

/// strftime pattern for human-readable timestamps (rendered in UTC).
pub const DEFAULT_TIME_FORMAT: &str = "%Y %b %d %H:%M";

/// How values are written in each row.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Human-readable sizes and dates instead of raw numbers
    pub human: bool,
    /// Decimal digits for human-readable sizes
    pub precision: u8,
    /// strftime pattern for human-readable dates
    pub time_format: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            human: true,
            precision: 2,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

/// Check a strftime pattern without formatting anything.
pub fn is_valid_time_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Format unix seconds in UTC. Out-of-range values fall back to the raw number.
pub fn format_timestamp(secs: i64, format: &str) -> String {
    match DateTime::<Utc>::from_timestamp(secs, 0) {
        Some(dt) => dt.format(format).to_string(),
        None => secs.to_string(),
    }
}

/// The cells of one row, in [`HEADERS`] order.
pub fn row_cells(entry: &Entry, options: &RenderOptions) -> Vec<String> {
    let size = if options.human {
        bytes_to_human(entry.size_bytes, options.precision)
    } else {
        entry.size_bytes.to_string()
    };
    let time = |secs: i64| {
        if options.human {
            format_timestamp(secs, &options.time_format)
        } else {
            secs.to_string()
        }
    };

    vec![
        entry.name.clone(),
        size,
        entry.depth.to_string(),
        entry.num_of_files.to_string(),
        time(entry.atime),
        time(entry.mtime),
        time(entry.ctime),
    ]
}

/// Render entries in the requested format. No trailing newline.
pub fn render(entries: &[Entry], format: OutputFormat, options: &RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Table(style) => Ok(render_table(entries, style, options)),
        OutputFormat::Csv => render_csv(entries, options),
        OutputFormat::Json => render_json(entries, options),
    }
}

fn render_table(entries: &[Entry], style: TableStyle, options: &RenderOptions) -> String {
    let mut table = Table::new();
    match style {
        TableStyle::Simple => table.load_preset(presets::ASCII_HORIZONTAL_ONLY),
        TableStyle::Plain => table.load_preset(presets::NOTHING),
        TableStyle::Grid => table.load_preset(presets::ASCII_FULL),
        TableStyle::FancyGrid => table.load_preset(presets::UTF8_FULL),
        TableStyle::Github => table.load_preset(presets::ASCII_MARKDOWN),
        TableStyle::Rounded => table
            .load_preset(presets::UTF8_FULL)
            .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS),
    };

    table.set_header(HEADERS.to_vec());
    for entry in entries {
        table.add_row(row_cells(entry, options));
    }
    for column in table.column_iter_mut() {
        column.set_cell_alignment(CellAlignment::Right);
    }

    table.to_string()
}

fn render_csv(entries: &[Entry], options: &RenderOptions) -> Result<String> {
    let output_error = |e: csv::Error| DirtError::Output(e.to_string());

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    writer.write_record(HEADERS).map_err(output_error)?;
    for entry in entries {
        writer
            .write_record(row_cells(entry, options))
            .map_err(output_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DirtError::Output(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| DirtError::Output(e.to_string()))?;

    Ok(text.trim_end().to_string())
}

fn render_json(entries: &[Entry], options: &RenderOptions) -> Result<String> {
    let rows: Vec<Value> = entries
        .iter()
        .map(|entry| {
            if options.human {
                let cells = row_cells(entry, options);
                json!({
                    "name": entry.name,
                    "size": cells[1],
                    "depth": entry.depth,
                    "num_of_files": entry.num_of_files,
                    "atime": cells[4],
                    "mtime": cells[5],
                    "ctime": cells[6],
                })
            } else {
                json!(entry)
            }
        })
        .collect();

    serde_json::to_string_pretty(&rows).map_err(|e| DirtError::Output(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileStat;
    use std::path::PathBuf;

    // 2021-01-01 00:00:00 UTC
    const NEW_YEAR: i64 = 1_609_459_200;

    fn create_test_entries() -> Vec<Entry> {
        let stat = |size| FileStat {
            size,
            atime: NEW_YEAR,
            mtime: NEW_YEAR,
            ctime: NEW_YEAR,
        };
        vec![
            Entry::file("large.bin".into(), PathBuf::from("/t/large.bin"), 0, &stat(1536)),
            Entry::file("small.txt".into(), PathBuf::from("/t/small.txt"), 0, &stat(10)),
        ]
    }

    fn raw() -> RenderOptions {
        RenderOptions {
            human: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(NEW_YEAR, DEFAULT_TIME_FORMAT), "2021 Jan 01 00:00");
        assert_eq!(format_timestamp(NEW_YEAR, "%Y-%m-%d"), "2021-01-01");
    }

    #[test]
    fn test_time_format_validation() {
        assert!(is_valid_time_format(DEFAULT_TIME_FORMAT));
        assert!(is_valid_time_format("%F %T"));
        assert!(!is_valid_time_format("%Q"));
    }

    #[test]
    fn test_row_cells_human_and_raw() {
        let entries = create_test_entries();

        let human = row_cells(&entries[0], &RenderOptions::default());
        assert_eq!(human[0], "large.bin");
        assert_eq!(human[1], "1.5 KB");
        assert_eq!(human[2], "0");
        assert_eq!(human[3], "1");
        assert_eq!(human[4], "2021 Jan 01 00:00");

        let raw = row_cells(&entries[0], &raw());
        assert_eq!(raw[1], "1536");
        assert_eq!(raw[4], NEW_YEAR.to_string());
    }

    #[test]
    fn test_render_table_has_headers_and_rows() {
        let output = render(
            &create_test_entries(),
            OutputFormat::default(),
            &RenderOptions::default(),
        )
        .unwrap();

        for header in HEADERS {
            assert!(output.contains(header), "missing {}", header);
        }
        assert!(output.contains("large.bin"));
        assert!(output.contains("1.5 KB"));
        assert!(output.contains("10 B"));

        // Header comes before rows, rows keep their order
        let header_at = output.find("Name").unwrap();
        let large_at = output.find("large.bin").unwrap();
        let small_at = output.find("small.txt").unwrap();
        assert!(header_at < large_at && large_at < small_at);
    }

    #[test]
    fn test_render_every_table_style() {
        for style in TableStyle::ALL {
            let output = render(
                &create_test_entries(),
                OutputFormat::Table(style),
                &RenderOptions::default(),
            )
            .unwrap();
            assert!(output.contains("small.txt"), "style {}", style.as_str());
        }
    }

    #[test]
    fn test_render_csv_quotes_non_numeric() {
        let output = render(&create_test_entries(), OutputFormat::Csv, &raw()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            r#""Name","Size","Depth","Files","Access Time","Modify Time","Change Time""#
        );
        assert_eq!(
            lines[1],
            format!(
                r#""large.bin",1536,0,1,{t},{t},{t}"#,
                t = NEW_YEAR
            )
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_csv_human_sizes_are_quoted() {
        let output = render(
            &create_test_entries(),
            OutputFormat::Csv,
            &RenderOptions::default(),
        )
        .unwrap();

        assert!(output.contains(r#""large.bin","1.5 KB",0,1,"2021 Jan 01 00:00""#));
        assert!(!output.ends_with('\n'));
    }

    #[test]
    fn test_render_json() {
        let output = render(&create_test_entries(), OutputFormat::Json, &raw()).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["name"], "large.bin");
        assert_eq!(parsed[0]["size"], 1536);
        assert_eq!(parsed[1]["num_of_files"], 1);

        let output = render(
            &create_test_entries(),
            OutputFormat::Json,
            &RenderOptions::default(),
        )
        .unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["size"], "1.5 KB");
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DirtError;

/// Border style of the table output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    Simple,
    Plain,
    Grid,
    FancyGrid,
    Github,
    Rounded,
}

impl TableStyle {
    pub const ALL: [TableStyle; 6] = [
        TableStyle::Simple,
        TableStyle::Plain,
        TableStyle::Grid,
        TableStyle::FancyGrid,
        TableStyle::Github,
        TableStyle::Rounded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TableStyle::Simple => "simple",
            TableStyle::Plain => "plain",
            TableStyle::Grid => "grid",
            TableStyle::FancyGrid => "fancy_grid",
            TableStyle::Github => "github",
            TableStyle::Rounded => "rounded",
        }
    }
}

/// How rows are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    Table(TableStyle),
    Csv,
    Json,
}

impl OutputFormat {
    /// Every accepted name, for help and error messages.
    pub fn names() -> Vec<&'static str> {
        let mut names = vec!["csv", "json"];
        names.extend(TableStyle::ALL.iter().map(|s| s.as_str()));
        names
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table(TableStyle::Simple)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table(style) => f.write_str(style.as_str()),
            OutputFormat::Csv => f.write_str("csv"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DirtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "csv" => return Ok(OutputFormat::Csv),
            "json" => return Ok(OutputFormat::Json),
            _ => {}
        }

        TableStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == lower)
            .map(OutputFormat::Table)
            .ok_or_else(|| {
                DirtError::InvalidArgument(format!(
                    "invalid output format '{}', expected one of: {}",
                    s,
                    OutputFormat::names().join(", ")
                ))
            })
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = DirtError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(value: OutputFormat) -> Self {
        value.to_string()
    }
}

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::entry::Entry;
use crate::error::DirtError;

/// Field entries can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Size,
    Depth,
    NumOfFiles,
    Atime,
    Mtime,
    Ctime,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Name,
        SortKey::Size,
        SortKey::Depth,
        SortKey::NumOfFiles,
        SortKey::Atime,
        SortKey::Mtime,
        SortKey::Ctime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Size => "size",
            SortKey::Depth => "depth",
            SortKey::NumOfFiles => "num_of_files",
            SortKey::Atime => "atime",
            SortKey::Mtime => "mtime",
            SortKey::Ctime => "ctime",
        }
    }

    fn compare(self, a: &Entry, b: &Entry) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Size => a.size_bytes.cmp(&b.size_bytes),
            SortKey::Depth => a.depth.cmp(&b.depth),
            SortKey::NumOfFiles => a.num_of_files.cmp(&b.num_of_files),
            SortKey::Atime => a.atime.cmp(&b.atime),
            SortKey::Mtime => a.mtime.cmp(&b.mtime),
            SortKey::Ctime => a.ctime.cmp(&b.ctime),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort key plus direction, written `<key>_<asc|desc>` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortBy {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortBy {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Every accepted spelling, for help and error messages.
    pub fn variants() -> Vec<String> {
        SortKey::ALL
            .iter()
            .flat_map(|key| {
                [SortDirection::Asc, SortDirection::Desc]
                    .into_iter()
                    .map(move |direction| SortBy::new(*key, direction).to_string())
            })
            .collect()
    }
}

impl Default for SortBy {
    /// Most recently accessed first.
    fn default() -> Self {
        Self::new(SortKey::Atime, SortDirection::Desc)
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.key.as_str(), self.direction.as_str())
    }
}

impl FromStr for SortBy {
    type Err = DirtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            DirtError::InvalidArgument(format!(
                "invalid sort by option '{}', expected one of: {}",
                s,
                SortBy::variants().join(", ")
            ))
        };

        let lower = s.trim().to_lowercase();
        let (key, direction) = lower.rsplit_once('_').ok_or_else(invalid)?;

        let key = SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(invalid)?;
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(invalid()),
        };

        Ok(SortBy::new(key, direction))
    }
}

impl TryFrom<String> for SortBy {
    type Error = DirtError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortBy> for String {
    fn from(value: SortBy) -> Self {
        value.to_string()
    }
}

/// Stable in-place sort: entries with equal keys keep their scan order in
/// both directions.
pub fn sort_entries(entries: &mut [Entry], sort_by: SortBy) {
    entries.sort_by(|a, b| {
        let ordering = sort_by.key.compare(a, b);
        match sort_by.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::output::{is_valid_time_format, OutputFormat, DEFAULT_TIME_FORMAT};
use crate::scanner::{SortBy, MAX_DEPTH, MAX_PRECISION};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listing: ListingConfig,
    pub trim: TrimConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Sort order, `<key>_<asc|desc>`
    pub sort_by: SortBy,
    /// csv, json or a table style
    pub output: OutputFormat,
    /// Decimal digits of human-readable sizes (0-11)
    pub precision: u8,
    /// Levels materialized as separate rows (0-2)
    pub depth: u8,
    /// Human-readable sizes and dates
    pub human: bool,
    /// strftime pattern for dates
    pub time_format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Report what would be deleted without deleting
    pub dry_run: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            sort_by: SortBy::default(),
            output: OutputFormat::default(),
            precision: 2,
            depth: 0,
            human: true,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Default config location: `$XDG_CONFIG_HOME/dirt/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dirt").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and defaults are used if there is no file there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");

        Ok(config)
    }

    /// Check values that the types alone don't constrain.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.listing.precision > MAX_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "precision must be 0-{}, got {}",
                MAX_PRECISION, self.listing.precision
            )));
        }
        if self.listing.depth as usize > MAX_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "depth must be 0-{}, got {}",
                MAX_DEPTH, self.listing.depth
            )));
        }
        if !is_valid_time_format(&self.listing.time_format) {
            return Err(ConfigError::Invalid(format!(
                "invalid time_format '{}'",
                self.listing.time_format
            )));
        }
        Ok(())
    }
}

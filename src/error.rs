use std::path::PathBuf;
use thiserror::Error;

use crate::scanner::SizeParseError;

/// Core library errors
#[derive(Error, Debug)]
pub enum DirtError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Path not found or unreadable '{path}': {source}")]
    PathError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("--trim-down value cannot be only numeric to prevent accident, {0} given")]
    AmbiguousSize(String),

    #[error("Invalid size: {0}")]
    Parse(#[from] SizeParseError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DirtError>;

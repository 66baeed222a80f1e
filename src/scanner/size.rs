use std::fs::Metadata;
use thiserror::Error;

/// Largest number of decimal digits accepted for human-readable sizes.
pub const MAX_PRECISION: u8 = 11;

/// Unit labels used when formatting, index = power of 1024.
const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

/// Errors produced while decoding a human-readable size.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeParseError {
    #[error("empty size string")]
    Empty,

    #[error("cannot convert to a number: '{0}'")]
    InvalidNumber(String),

    #[error("unknown size unit in '{0}'")]
    UnknownUnit(String),

    #[error("size out of range: '{0}'")]
    OutOfRange(String),
}

/// Get apparent file size (content length)
pub fn apparent_size(metadata: &Metadata) -> u64 {
    metadata.len()
}

/// Power of 1024 for a unit suffix, case-insensitive. An empty suffix means bytes.
fn unit_exponent(unit: &str) -> Option<u32> {
    match unit.to_ascii_lowercase().as_str() {
        "" | "b" | "byte" | "bytes" => Some(0),
        "kb" => Some(1),
        "mb" => Some(2),
        "gb" => Some(3),
        "tb" => Some(4),
        "pb" => Some(5),
        _ => None,
    }
}

/// Parse a size string like "900mb" or "1.5 GB" into bytes.
///
/// Units are binary (1 KB = 1024 bytes). A number without a unit is taken as
/// bytes; callers that want to refuse bare numbers have to check for that
/// themselves. Fractional values are rounded to the nearest byte.
pub fn human_to_bytes(text: &str) -> Result<u64, SizeParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SizeParseError::Empty);
    }

    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (num_str, unit_str) = trimmed.split_at(split);
    let num_str = num_str.trim();

    if num_str.is_empty() {
        return Err(SizeParseError::InvalidNumber(text.to_string()));
    }

    let value: f64 = num_str
        .parse()
        .map_err(|_| SizeParseError::InvalidNumber(text.to_string()))?;

    let exponent =
        unit_exponent(unit_str).ok_or_else(|| SizeParseError::UnknownUnit(text.to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(SizeParseError::OutOfRange(text.to_string()));
    }

    let bytes = (value * (1u64 << (10 * exponent)) as f64).round();
    // `u64::MAX as f64` is exactly 2^64; the cast below saturates up to it.
    if bytes > u64::MAX as f64 {
        return Err(SizeParseError::OutOfRange(text.to_string()));
    }

    Ok(bytes as u64)
}

/// Format a byte count using the largest unit that keeps the mantissa >= 1.
///
/// The mantissa is rounded to `precision` decimal digits and trailing zeros
/// are dropped, so `1536` gives `"1.5 KB"` and `1024` gives `"1 KB"`.
pub fn bytes_to_human(bytes: u64, precision: u8) -> String {
    if bytes < 1024 {
        return format!("{} {}", bytes, UNITS[0]);
    }

    let highest_bit = 63 - bytes.leading_zeros() as usize;
    let mut exponent = (highest_bit / 10).min(UNITS.len() - 1);
    let mut number = format_mantissa(bytes, exponent, precision);

    // Rounding can carry the mantissa up to 1024, e.g. 1048575 -> "1024".
    if exponent + 1 < UNITS.len() && number.parse::<f64>().is_ok_and(|n| n >= 1024.0) {
        exponent += 1;
        number = format_mantissa(bytes, exponent, precision);
    }

    format!("{} {}", number, UNITS[exponent])
}

fn format_mantissa(bytes: u64, exponent: usize, precision: u8) -> String {
    let mantissa = bytes as f64 / (1u64 << (10 * exponent)) as f64;

    let mut number = format!("{:.*}", precision as usize, mantissa);
    if number.contains('.') {
        let kept = number.trim_end_matches('0').trim_end_matches('.').len();
        number.truncate(kept);
    }
    number
}

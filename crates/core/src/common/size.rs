//! Human-readable size strings.
//!
//! Sizes are a decimal integer with an optional, case-insensitive unit suffix.
//! Units are binary: `B` = 1, `KB` = 1024, `MB` = 1024², `GB` = 1024³.
//! A bare number is a byte count.

use super::error::ConfigError;

/// Unit suffixes and their multipliers, largest first (used by `format_size`).
const UNITS: [(&str, u64); 4] = [
    ("GB", 1024 * 1024 * 1024),
    ("MB", 1024 * 1024),
    ("KB", 1024),
    ("B", 1),
];

/// Parses a size string such as `"1KB"`, `"64B"`, `"2 mb"` or `"4096"` into bytes.
///
/// Zero is accepted here; positivity is a geometry invariant and is checked
/// when the configuration is validated.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSize`] when the number is missing, the unit is
/// unknown, or the value does not fit in 64 bits.
pub fn parse_size(input: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: &'static str| ConfigError::InvalidSize {
        input: input.to_string(),
        reason,
    };

    let text = input.trim();
    if text.is_empty() {
        return Err(invalid("empty size"));
    }

    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (digits, unit) = text.split_at(split);
    if digits.is_empty() {
        return Err(invalid("missing number"));
    }

    let value: u64 = digits.parse().map_err(|_| invalid("number too large"))?;
    let unit = unit.trim().to_ascii_uppercase();
    let multiplier = if unit.is_empty() {
        1
    } else {
        UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|&(_, m)| m)
            .ok_or_else(|| invalid("unknown unit, expected B, KB, MB or GB"))?
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| invalid("size overflows 64 bits"))
}

/// Renders a byte count with the largest unit that divides it exactly.
///
/// `format_size(1024)` is `"1KB"`, `format_size(1536)` is `"1536B"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }
    for (name, multiplier) in UNITS {
        if bytes % multiplier == 0 {
            return format!("{}{name}", bytes / multiplier);
        }
    }
    format!("{bytes}B")
}

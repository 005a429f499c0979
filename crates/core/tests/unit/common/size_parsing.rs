//! Size String Tests.
//!
//! Verifies `parse_size` and `format_size`: unit suffixes, case handling,
//! bare byte counts, and every rejection reason.

use cachesim_core::common::{ConfigError, format_size, parse_size};
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Accepted Inputs
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("64B", 64)]
#[case("1KB", 1024)]
#[case("1kb", 1024)]
#[case("4Kb", 4096)]
#[case("2MB", 2 * 1024 * 1024)]
#[case("1GB", 1024 * 1024 * 1024)]
#[case("4096", 4096)]
#[case("  16 KB  ", 16 * 1024)]
#[case("0", 0)]
fn parses_sizes(#[case] input: &str, #[case] expected: u64) {
    assert_eq!(parse_size(input).unwrap(), expected);
}

// ══════════════════════════════════════════════════════════
// 2. Rejected Inputs
// ══════════════════════════════════════════════════════════

fn reason_of(input: &str) -> &'static str {
    match parse_size(input) {
        Err(ConfigError::InvalidSize { reason, .. }) => reason,
        other => panic!("expected InvalidSize for {input:?}, got {other:?}"),
    }
}

#[test]
fn rejects_empty_input() {
    assert_eq!(reason_of(""), "empty size");
    assert_eq!(reason_of("   "), "empty size");
}

#[test]
fn rejects_missing_number() {
    assert_eq!(reason_of("KB"), "missing number");
    assert_eq!(reason_of("abc"), "missing number");
}

/// Fractions are not sizes; the dot is read as an unknown unit.
#[rstest]
#[case("12XB")]
#[case("1.5KB")]
#[case("10 bytes")]
#[case("1TB")]
fn rejects_unknown_units(#[case] input: &str) {
    assert_eq!(reason_of(input), "unknown unit, expected B, KB, MB or GB");
}

#[test]
fn rejects_overflow() {
    assert_eq!(reason_of("99999999999999999999999"), "number too large");
    assert_eq!(reason_of("17179869184GB"), "size overflows 64 bits");
}

#[test]
fn error_message_names_the_input() {
    let err = parse_size("12XB").unwrap_err();
    assert!(err.to_string().contains("\"12XB\""));
}

// ══════════════════════════════════════════════════════════
// 3. Formatting
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0, "0B")]
#[case(64, "64B")]
#[case(1024, "1KB")]
#[case(1536, "1536B")]
#[case(3 * 1024 * 1024, "3MB")]
#[case(2048 * 1024 * 1024, "2GB")]
fn formats_with_largest_exact_unit(#[case] bytes: u64, #[case] expected: &str) {
    assert_eq!(format_size(bytes), expected);
}

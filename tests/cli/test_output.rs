//! Tests for CLI output formatting helpers
//!
//! - Duration formatting (ms, s, m)
//! - Metadata value rendering
//! - Character-safe line truncation

use ragdex::cli::output::{format_duration, format_value, truncate_line};
use serde_json::json;

#[test]
fn test_format_duration_ranges() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.25), "250ms");
    assert_eq!(format_duration(1.5), "1.50s");
    assert_eq!(format_duration(59.99), "59.99s");
    assert_eq!(format_duration(90.0), "1m 30.0s");
}

#[test]
fn test_format_value_unquotes_strings() {
    assert_eq!(format_value(&json!("python")), "python");
    assert_eq!(format_value(&json!(42)), "42");
    assert_eq!(format_value(&json!(true)), "true");
    assert_eq!(format_value(&json!(null)), "null");
}

#[test]
fn test_truncate_line_counts_characters() {
    assert_eq!(truncate_line("short", 10), "short");
    assert_eq!(truncate_line("abcdefghij", 10), "abcdefghij");
    assert_eq!(truncate_line("abcdefghijk", 10), "abcdefg...");

    let wide = "日本語".repeat(10);
    let cut = truncate_line(&wide, 8);
    assert_eq!(cut.chars().count(), 8);
    assert!(cut.ends_with("..."));
}

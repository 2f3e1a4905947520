//! Defensive readers for vendor JSON.
//!
//! Vendors omit or null out fields freely; these helpers turn a missing field
//! into `None` (or the `unknown` placeholder) instead of an error.

use serde_json::Value;

/// Placeholder shown in place of a missing field.
pub const UNKNOWN: &str = "unknown";

/// Non-empty string at a JSON pointer.
pub fn text<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Number at a JSON pointer, rendered the way the vendor sent it
/// (`15` stays `15`, `15.27` stays `15.27`).
pub fn number(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Number at a JSON pointer as `f64`.
pub fn float(value: &Value, pointer: &str) -> Option<f64> {
    value.pointer(pointer).and_then(Value::as_f64)
}

/// Array at a JSON pointer; missing or non-array yields an empty slice.
pub fn array<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Cut `s` to at most `max` characters, appending `...` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", s[..idx].trim_end()),
        None => s.to_owned(),
    }
}

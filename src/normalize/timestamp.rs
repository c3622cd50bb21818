//! Timestamp normalization for provider payloads.
//!
//! Every timestamp-like field becomes `YYYY-MM-DD HH:MM:SS` (or stays a
//! plain `YYYY-MM-DD` date). Values that cannot be interpreted pass
//! through as their string form.

use chrono::DateTime;
use serde_json::Value;

use super::path::{is_blank, value_at};

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether a JSON key names a timestamp field.
pub fn is_timestamp_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.ends_with("date") || key.ends_with("time") || key.ends_with("timestamp")
}

/// Normalize one scalar timestamp value.
///
/// Null stays null and containers are returned untouched.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(normalize_str(s)),
        Value::Number(n) => {
            let rendered = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .and_then(format_epoch);
            Value::String(rendered.unwrap_or_else(|| n.to_string()))
        }
        Value::Bool(b) => Value::String(b.to_string()),
        other => other.clone(),
    }
}

/// Normalize a timestamp string.
pub fn normalize_str(raw: &str) -> String {
    let s = raw.trim();
    let bytes = s.as_bytes();

    if has_date_prefix(bytes) && bytes.len() >= 19 && matches!(bytes[10], b'T' | b' ') {
        if has_time_at(bytes, 11) {
            return format!("{} {}", &s[..10], &s[11..19]);
        }
    }
    if has_date_prefix(bytes) && bytes.len() == 10 {
        return s.to_string();
    }
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(rendered) = s.parse::<i64>().ok().and_then(format_epoch) {
            return rendered;
        }
    }
    raw.to_string()
}

/// Normalized timestamp at `path`; null and blank placeholders are absent.
pub fn timestamp_at(node: &Value, path: &str) -> Option<String> {
    match normalize_value(value_at(node, path)?) {
        Value::String(s) if !is_blank(&s) => Some(s),
        _ => None,
    }
}

/// Render epoch seconds (or milliseconds when 13 digits long) in UTC.
fn format_epoch(value: i64) -> Option<String> {
    if value <= 0 {
        return None;
    }
    let secs = if value.to_string().len() == 13 {
        value / 1000
    } else {
        value
    };
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format(OUTPUT_FORMAT).to_string())
}

/// Recursively normalize every timestamp field in `tree`.
pub fn normalize_tree(tree: &mut Value) {
    match tree {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if is_timestamp_key(key) && !matches!(value, Value::Object(_) | Value::Array(_)) {
                    *value = normalize_value(value);
                } else {
                    normalize_tree(value);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_tree),
        _ => {}
    }
}

fn has_date_prefix(b: &[u8]) -> bool {
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

fn has_time_at(b: &[u8], at: usize) -> bool {
    b.len() >= at + 8
        && b[at..at + 2].iter().all(u8::is_ascii_digit)
        && b[at + 2] == b':'
        && b[at + 3..at + 5].iter().all(u8::is_ascii_digit)
        && b[at + 5] == b':'
        && b[at + 6..at + 8].iter().all(u8::is_ascii_digit)
}

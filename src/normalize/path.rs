//! Tolerant navigation over provider JSON.
//!
//! Paths are dot-separated; numeric segments index arrays. Any missing
//! step yields `None` (or an empty slice / default) instead of failing.

use serde_json::Value;

static EMPTY: Vec<Value> = Vec::new();

/// Walk `path` from `root`. `""` returns `root`.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split('.').try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Non-null value at `path`.
pub fn value_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    get_path(root, path).filter(|v| !v.is_null())
}

/// String form of a scalar at `path`. Numbers and booleans are rendered;
/// objects, arrays and null yield `None`.
pub fn str_at(root: &Value, path: &str) -> Option<String> {
    match get_path(root, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Like [`str_at`] but treats blank strings and the literals `"null"` /
/// `"None"` as absent.
pub fn text_at(root: &Value, path: &str) -> Option<String> {
    str_at(root, path).filter(|s| !is_blank(s))
}

/// Finite numeric value at `path`, accepting numeric strings.
/// `"inf"` and `"NaN"` are absent.
pub fn f64_at(root: &Value, path: &str) -> Option<f64> {
    let value = match get_path(root, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    value.filter(|f: &f64| f.is_finite())
}

pub fn bool_at(root: &Value, path: &str) -> bool {
    matches!(get_path(root, path), Some(Value::Bool(true)))
}

/// Array at `path`, or an empty slice.
pub fn array_at<'a>(root: &'a Value, path: &str) -> &'a [Value] {
    match get_path(root, path) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => EMPTY.as_slice(),
    }
}

/// Value at `path` as a list: arrays as-is, a lone object as one element.
pub fn one_or_many<'a>(root: &'a Value, path: &str) -> Vec<&'a Value> {
    match get_path(root, path) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(v @ Value::Object(_)) => vec![v],
        _ => Vec::new(),
    }
}

/// String elements of the array at `path`.
pub fn strings_at(root: &Value, path: &str) -> Vec<String> {
    array_at(root, path)
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Clone of the value at `path`, `Value::Null` when absent.
pub fn cloned_at(root: &Value, path: &str) -> Value {
    get_path(root, path).cloned().unwrap_or(Value::Null)
}

/// Blank, `"null"` and `"None"` count as no value.
pub fn is_blank(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.eq_ignore_ascii_case("null") || t == "None"
}

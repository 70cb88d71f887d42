//! Defensive field access over loosely-shaped JSON records.
//!
//! Upstream payloads are not trusted to be complete: any field may be missing,
//! null, or of the wrong type. Every typed read in this crate goes through the
//! helpers below, which resolve such cases to a caller-supplied fallback.

use serde_json::Value;

/// Walk a dotted path (`"main.temp"`, `"weather.0.icon"`) through `record`.
///
/// Numeric segments index into arrays. Returns `None` when any step is absent
/// or the value at the end is `null`.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;

    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    (!current.is_null()).then_some(current)
}

pub fn get_f64(record: &Value, path: &str, fallback: f64) -> f64 {
    lookup(record, path)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(fallback)
}

/// Integer read. Floats with no fractional part are accepted.
pub fn get_i64(record: &Value, path: &str, fallback: i64) -> i64 {
    opt_i64(record, path).unwrap_or(fallback)
}

pub fn get_str<'a>(record: &'a Value, path: &str, fallback: &'a str) -> &'a str {
    lookup(record, path).and_then(Value::as_str).unwrap_or(fallback)
}

/// Like [`get_i64`], but keeps absence visible to the caller.
pub fn opt_i64(record: &Value, path: &str) -> Option<i64> {
    let value = lookup(record, path)?;

    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

//! Field lookup with precedence chains
//!
//! Each output field names its sources in order, legacy name first. The
//! first source holding a usable value wins; otherwise the type's default.

use crate::dates::normalize_date;
use crate::payload::Record;
use serde_json::Value;

/// Resolve a key or a dotted path such as `author.name`. Nulls count as absent.
pub fn lookup<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }

    Some(current).filter(|value| !value.is_null())
}

/// First source whose value converts
pub fn first<T>(
    record: &Record,
    keys: &[&str],
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter()
        .find_map(|key| lookup(record, key).and_then(|value| convert(value)))
}

pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn text(record: &Record, keys: &[&str]) -> String {
    first(record, keys, as_text).unwrap_or_default()
}

pub fn integer(record: &Record, keys: &[&str]) -> i64 {
    first(record, keys, as_integer).unwrap_or(0)
}

pub fn decimal(record: &Record, keys: &[&str]) -> f64 {
    first(record, keys, as_decimal).unwrap_or(0.0)
}

/// String array; scalar entries are stringified, the rest dropped
pub fn strings(record: &Record, keys: &[&str]) -> Vec<String> {
    first(record, keys, |value| {
        value
            .as_array()
            .map(|items| items.iter().filter_map(as_text).collect())
    })
    .unwrap_or_default()
}

/// Object array, passed through as-is
pub fn objects(record: &Record, keys: &[&str]) -> Vec<Value> {
    first(record, keys, |value| {
        value
            .as_array()
            .map(|items| items.iter().filter(|item| item.is_object()).cloned().collect())
    })
    .unwrap_or_default()
}

/// Date normalised to `YYYY-MM-DD` where possible
pub fn date(record: &Record, keys: &[&str]) -> String {
    first(record, keys, |value| Some(normalize_date(value))).unwrap_or_default()
}

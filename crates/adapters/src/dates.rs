//! Best-effort date normalisation to `YYYY-MM-DD`

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Epoch values at or above this are taken as milliseconds
const MILLIS_THRESHOLD: f64 = 100_000_000_000.0;

/// Normalise a date value. Anything unparseable comes back in its original
/// string form.
pub fn normalize_date(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(raw) => normalize_text(raw),
        Value::Number(n) => n
            .as_f64()
            .and_then(from_epoch)
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

fn normalize_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    parse_text(trimmed)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_text(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    ["%Y/%m/%d", "%d-%m-%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn from_epoch(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let millis = if value.abs() >= MILLIS_THRESHOLD {
        value as i64
    } else {
        (value * 1000.0) as i64
    };

    DateTime::from_timestamp_millis(millis).map(|dt| dt.format(DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_formats() {
        assert_eq!(normalize_date(&json!("2025-03-01T10:30:00Z")), "2025-03-01");
        assert_eq!(normalize_date(&json!("2025-03-01T23:30:00-05:00")), "2025-03-01");
        assert_eq!(normalize_date(&json!("2025-03-01")), "2025-03-01");
        assert_eq!(normalize_date(&json!("2025-03-01T10:30:00.250")), "2025-03-01");
        assert_eq!(normalize_date(&json!("2025/03/01")), "2025-03-01");
        assert_eq!(normalize_date(&json!("01-03-2025")), "2025-03-01");
    }

    #[test]
    fn test_epoch_numbers() {
        assert_eq!(normalize_date(&json!(1_740_787_200_000_i64)), "2025-03-01");
        assert_eq!(normalize_date(&json!(1_740_787_200_i64)), "2025-03-01");
    }

    #[test]
    fn test_unparseable_falls_back() {
        assert_eq!(normalize_date(&json!("next tuesday")), "next tuesday");
        assert_eq!(normalize_date(&json!(true)), "true");
        assert_eq!(normalize_date(&json!({ "y": 2025 })), "{\"y\":2025}");
        assert_eq!(normalize_date(&json!("   ")), "");
        assert_eq!(normalize_date(&Value::Null), "");
    }
}

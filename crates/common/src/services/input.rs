//! Lenient input normalisation
//!
//! Recoverable bad values (unknown enum variants, malformed ids) are
//! omitted from a filter or update instead of failing the request.
//! Every omission is logged and counted.

use crate::metrics::record_dropped_input;
use serde::{Deserialize, Deserializer};
use tracing::warn;
use uuid::Uuid;

/// Deserialize a present field as `Some`, so `null` becomes `Some(None)`.
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Parse a store identifier
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Trimmed text, `None` when blank
pub fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// `true|false|1|0`, case-insensitive
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Log and count a dropped value
pub fn dropped(field: &'static str, value: &str) {
    warn!(field, value, "Ignoring invalid input value");
    record_dropped_input(field);
}

/// Apply `parse` to an optional raw value; unparseable values are dropped
pub fn lenient<T>(
    field: &'static str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse(raw);
    if parsed.is_none() {
        dropped(field, raw);
    }
    parsed
}

/// A reference on create: valid ids are kept, anything else is dropped
pub fn reference(field: &'static str, raw: Option<&str>) -> Option<Uuid> {
    lenient(field, raw, parse_id)
}

/// A reference on update.
///
/// `null` or `""` clears, a valid id sets, any other value leaves the
/// stored reference untouched.
pub fn reference_update(field: &'static str, raw: Option<Option<String>>) -> Option<Option<Uuid>> {
    match raw {
        None => None,
        Some(None) => Some(None),
        Some(Some(value)) if value.trim().is_empty() => Some(None),
        Some(Some(value)) => match parse_id(&value) {
            Some(id) => Some(Some(id)),
            None => {
                dropped(field, &value);
                None
            }
        },
    }
}

/// Nullable text on update: `null` or blank clears, otherwise the trimmed value
pub fn text_update(raw: Option<Option<String>>) -> Option<Option<String>> {
    raw.map(non_blank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize_some")]
        parent: Option<Option<String>>,
    }

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        let null: Body = serde_json::from_str(r#"{"parent": null}"#).unwrap();
        let value: Body = serde_json::from_str(r#"{"parent": "x"}"#).unwrap();

        assert_eq!(absent.parent, None);
        assert_eq!(null.parent, Some(None));
        assert_eq!(value.parent, Some(Some("x".to_string())));
    }

    #[test]
    fn test_reference_update() {
        let id = Uuid::new_v4();
        assert_eq!(reference_update("parentInstitutionId", None), None);
        assert_eq!(reference_update("parentInstitutionId", Some(None)), Some(None));
        assert_eq!(reference_update("parentInstitutionId", Some(Some("".into()))), Some(None));
        assert_eq!(reference_update("parentInstitutionId", Some(Some("  ".into()))), Some(None));
        assert_eq!(
            reference_update("parentInstitutionId", Some(Some(id.to_string()))),
            Some(Some(id))
        );
        assert_eq!(reference_update("parentInstitutionId", Some(Some("garbage".into()))), None);
    }

    #[test]
    fn test_reference_on_create() {
        let id = Uuid::new_v4();
        assert_eq!(reference("organizationId", Some(&id.to_string())), Some(id));
        assert_eq!(reference("organizationId", Some("garbage")), None);
        assert_eq!(reference("organizationId", Some("")), None);
        assert_eq!(reference("organizationId", None), None);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("yes"), None);
    }

    #[test]
    fn test_text_update() {
        assert_eq!(text_update(None), None);
        assert_eq!(text_update(Some(None)), Some(None));
        assert_eq!(text_update(Some(Some("  ".into()))), Some(None));
        assert_eq!(text_update(Some(Some(" MIT ".into()))), Some(Some("MIT".into())));
    }
}

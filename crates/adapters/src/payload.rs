//! Payload decoding
//!
//! Every response is decoded once into a [`Payload`] and then mapped with a
//! single exhaustive match, instead of probing properties at each call site.

use serde::Serialize;
use serde_json::{Map, Value};

/// A JSON object as it arrives from either API
pub type Record = Map<String, Value>;

/// An entity the client knows how to reshape into its legacy form
pub trait Entity {
    /// Key under which an envelope may carry the list, e.g. `events`
    const COLLECTION: &'static str;

    /// Canonical legacy shape; every field is always populated
    type Legacy: Serialize;

    /// True when the record already exposes the legacy-distinguishing field
    fn is_legacy(record: &Record) -> bool;

    fn to_legacy(record: &Record) -> Self::Legacy;
}

/// The shapes a response body can take
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<'a> {
    /// New API: `{ "success": bool, "data": ... }`
    Envelope {
        success: bool,
        data: Option<&'a Value>,
    },
    /// Already legacy-shaped; passed through unchanged
    Legacy(&'a Record),
    /// A bare array of records
    Records(&'a [Value]),
    /// A bare object that is not legacy-shaped
    Record(&'a Record),
    /// Null, numbers, strings and booleans
    Unsupported,
}

impl<'a> Payload<'a> {
    pub fn decode<E: Entity>(value: &'a Value) -> Self {
        match value {
            Value::Object(record) if record.contains_key("success") => Payload::Envelope {
                success: record.get("success").and_then(Value::as_bool).unwrap_or(false),
                data: record.get("data").filter(|data| !data.is_null()),
            },
            Value::Object(record) if E::is_legacy(record) => Payload::Legacy(record),
            Value::Object(record) => Payload::Record(record),
            Value::Array(items) => Payload::Records(items),
            _ => Payload::Unsupported,
        }
    }
}

/// Reshape any payload into a list of legacy records
pub fn adapt_list<E: Entity>(payload: &Value) -> Vec<Value> {
    match Payload::decode::<E>(payload) {
        Payload::Envelope {
            success: true,
            data: Some(data),
        } => envelope_data::<E>(data),
        Payload::Envelope { success, .. } => {
            tracing::debug!(success, collection = E::COLLECTION, "Envelope without usable data");
            Vec::new()
        }
        Payload::Legacy(record) => vec![Value::Object(record.clone())],
        Payload::Records(items) => records::<E>(items),
        Payload::Record(record) => vec![to_legacy_value::<E>(record)],
        Payload::Unsupported => Vec::new(),
    }
}

/// Reshape a single-record payload; `Value::Null` when there is nothing to map
pub fn adapt_one<E: Entity>(payload: &Value) -> Value {
    adapt_list::<E>(payload).into_iter().next().unwrap_or_default()
}

fn envelope_data<E: Entity>(data: &Value) -> Vec<Value> {
    match data {
        Value::Array(items) => records::<E>(items),
        Value::Object(record) => match record.get(E::COLLECTION) {
            Some(Value::Array(items)) => records::<E>(items),
            _ => vec![adapt_record::<E>(record)],
        },
        _ => Vec::new(),
    }
}

fn records<E: Entity>(items: &[Value]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(adapt_record::<E>(record)),
            other => {
                tracing::debug!(
                    entry = %other,
                    collection = E::COLLECTION,
                    "Dropping non-object entry"
                );
                None
            }
        })
        .collect()
}

fn adapt_record<E: Entity>(record: &Record) -> Value {
    if E::is_legacy(record) {
        Value::Object(record.clone())
    } else {
        to_legacy_value::<E>(record)
    }
}

fn to_legacy_value<E: Entity>(record: &Record) -> Value {
    serde_json::to_value(E::to_legacy(record)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Named;

    #[derive(Serialize)]
    struct LegacyNamed {
        name: String,
    }

    impl Entity for Named {
        const COLLECTION: &'static str = "items";
        type Legacy = LegacyNamed;

        fn is_legacy(record: &Record) -> bool {
            record.contains_key("name")
        }

        fn to_legacy(record: &Record) -> LegacyNamed {
            LegacyNamed {
                name: record
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            }
        }
    }

    #[test]
    fn test_decode_variants() {
        let envelope = json!({ "success": true, "data": [] });
        assert!(matches!(
            Payload::decode::<Named>(&envelope),
            Payload::Envelope { success: true, data: Some(_) }
        ));

        let legacy = json!({ "name": "x" });
        assert!(matches!(Payload::decode::<Named>(&legacy), Payload::Legacy(_)));

        let record = json!({ "title": "x" });
        assert!(matches!(Payload::decode::<Named>(&record), Payload::Record(_)));

        assert!(matches!(Payload::decode::<Named>(&json!([])), Payload::Records(_)));
        assert_eq!(Payload::decode::<Named>(&Value::Null), Payload::Unsupported);
        assert_eq!(Payload::decode::<Named>(&json!("text")), Payload::Unsupported);
    }

    #[test]
    fn test_success_must_be_boolean_true() {
        let payload = json!({ "success": "yes", "data": [{ "title": "a" }] });
        assert!(adapt_list::<Named>(&payload).is_empty());
    }

    #[test]
    fn test_envelope_collection_key() {
        let payload = json!({
            "success": true,
            "data": { "items": [{ "title": "a" }, null, 3, { "name": "b" }], "total": 2 }
        });

        let adapted = adapt_list::<Named>(&payload);
        assert_eq!(adapted, vec![json!({ "name": "a" }), json!({ "name": "b" })]);
    }

    #[test]
    fn test_envelope_single_object() {
        let payload = json!({ "success": true, "data": { "title": "solo" } });
        assert_eq!(adapt_one::<Named>(&payload), json!({ "name": "solo" }));
    }

    #[test]
    fn test_failed_or_empty_envelope() {
        assert!(adapt_list::<Named>(&json!({ "success": false, "data": [{ "title": "a" }] })).is_empty());
        assert!(adapt_list::<Named>(&json!({ "success": true })).is_empty());
        assert!(adapt_list::<Named>(&json!({ "success": true, "data": null })).is_empty());
        assert_eq!(adapt_one::<Named>(&json!({ "success": false })), Value::Null);
    }
}

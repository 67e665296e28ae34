//! Acado Client Adapters
//!
//! Reshape responses from either API contract into the legacy shape the
//! client renders:
//! - New API: camelCase records inside a `{ success, data }` envelope
//! - Legacy API: snake_case records, passed through unchanged
//!
//! Mapping never fails. Missing fields get empty defaults, unmapped statuses
//! pass verbatim and unparseable dates keep their original text.

pub mod community;
pub mod dates;
pub mod event;
pub mod fields;
pub mod payload;
pub mod status;

pub use community::{CommunityCategory, CommunityPost, LegacyCategory, LegacyPost};
pub use event::{Event, EventDetails, LegacyEvent, LegacyEventDetails, LegacyStage};
pub use payload::{adapt_list, adapt_one, Entity, Payload, Record};

use serde_json::Value;

/// Event list from either contract
pub fn adapt_events_to_legacy(payload: &Value) -> Vec<Value> {
    adapt_list::<Event>(payload)
}

/// Single event; applying it to its own output returns that output unchanged
pub fn adapt_event_to_legacy(payload: &Value) -> Value {
    adapt_one::<Event>(payload)
}

pub fn adapt_event_details_to_legacy(payload: &Value) -> Value {
    adapt_one::<EventDetails>(payload)
}

pub fn adapt_community_categories(payload: &Value) -> Vec<Value> {
    adapt_list::<CommunityCategory>(payload)
}

pub fn adapt_community_posts(payload: &Value) -> Vec<Value> {
    adapt_list::<CommunityPost>(payload)
}

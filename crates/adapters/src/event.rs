//! Event adapters

use crate::fields::{date, decimal, integer, objects, strings, text};
use crate::payload::{Entity, Record};
use crate::status::event_status;
use serde::Serialize;
use serde_json::Value;

/// Event as the legacy client renders it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyEvent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub mode: String,
    pub status: String,
    pub organizer: String,
    pub category: String,
    pub tags: Vec<String>,
    pub registration_count: i64,
    pub max_participants: i64,
    pub entry_fee: f64,
}

/// A competition round inside event details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyStage {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub position: i64,
}

/// Event details page: the event plus its rounds and rules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyEventDetails {
    #[serde(flatten)]
    pub event: LegacyEvent,
    pub competitions_details: Vec<LegacyStage>,
    pub rules: Vec<String>,
    pub eligibility: Vec<String>,
    pub prizes: Vec<Value>,
    pub faqs: Vec<Value>,
}

pub struct Event;

impl Entity for Event {
    const COLLECTION: &'static str = "events";
    type Legacy = LegacyEvent;

    /// `name` without `title`
    fn is_legacy(record: &Record) -> bool {
        record.contains_key("name") && !record.contains_key("title")
    }

    fn to_legacy(record: &Record) -> LegacyEvent {
        let status = text(record, &["status"]);

        LegacyEvent {
            id: text(record, &["id", "_id"]),
            name: text(record, &["name", "title"]),
            description: text(record, &["description", "summary"]),
            image: text(record, &["image", "bannerImage", "coverImage"]),
            start_date: date(record, &["start_date", "startDate"]),
            end_date: date(record, &["end_date", "endDate"]),
            location: text(record, &["location", "venue", "location.address"]),
            mode: text(record, &["mode", "eventMode"]),
            status: event_status(&status),
            organizer: text(record, &["organizer", "organizerName", "organizer.name"]),
            category: text(record, &["category", "categoryName", "category.name"]),
            tags: strings(record, &["tags"]),
            registration_count: integer(record, &["registration_count", "registrationCount"]),
            max_participants: integer(record, &["max_participants", "maxParticipants"]),
            entry_fee: decimal(record, &["entry_fee", "entryFee"]),
        }
    }
}

pub struct EventDetails;

impl Entity for EventDetails {
    const COLLECTION: &'static str = "event";
    type Legacy = LegacyEventDetails;

    fn is_legacy(record: &Record) -> bool {
        record.contains_key("competitions_details")
    }

    fn to_legacy(record: &Record) -> LegacyEventDetails {
        let rounds = objects(record, &["competitions_details", "stages", "competitions"]);

        LegacyEventDetails {
            event: Event::to_legacy(record),
            competitions_details: rounds
                .iter()
                .enumerate()
                .filter_map(|(index, round)| round.as_object().map(|r| stage(r, index)))
                .collect(),
            rules: strings(record, &["rules"]),
            eligibility: strings(record, &["eligibility", "eligibilityCriteria"]),
            prizes: objects(record, &["prizes", "rewards"]),
            faqs: objects(record, &["faqs"]),
        }
    }
}

fn stage(record: &Record, index: usize) -> LegacyStage {
    let position = integer(record, &["position", "order"]);

    LegacyStage {
        name: text(record, &["name", "title"]),
        description: text(record, &["description"]),
        start_date: date(record, &["start_date", "startDate"]),
        end_date: date(record, &["end_date", "endDate"]),
        // Rounds without an explicit position keep their list order
        position: if position > 0 { position } else { index as i64 + 1 },
    }
}

//! Publish checklists for events and scholarships
//!
//! An aggregate is publishable only when every checklist item holds.
//! These are pure predicates over a draft; nothing is stored.

use crate::metrics::record_publish_check;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A selection or process step as submitted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub position: Option<i64>,
}

/// A stage after normalisation; positions run `1..=n`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub position: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    /// `online`, `offline` or `hybrid`
    pub mode: Option<String>,
    #[serde(default)]
    pub stages: Vec<StageDraft>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub provider: Option<String>,
    pub amount: Option<f64>,
    pub benefits: Option<String>,
    pub application_start: Option<String>,
    pub application_deadline: Option<String>,
    #[serde(default)]
    pub eligibility: Vec<String>,
    #[serde(default)]
    pub stages: Vec<StageDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub key: &'static str,
    pub label: &'static str,
    pub satisfied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishChecklist {
    pub publishable: bool,
    pub items: Vec<ChecklistItem>,
    /// Keys of unsatisfied items, in checklist order
    pub missing: Vec<&'static str>,
}

impl PublishChecklist {
    fn from_items(items: Vec<ChecklistItem>) -> Self {
        let missing: Vec<&'static str> = items
            .iter()
            .filter(|item| !item.satisfied)
            .map(|item| item.key)
            .collect();

        Self {
            publishable: missing.is_empty(),
            items,
            missing,
        }
    }
}

fn item(key: &'static str, label: &'static str, satisfied: bool) -> ChecklistItem {
    ChecklistItem { key, label, satisfied }
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
}

fn date(value: &Option<String>) -> Option<NaiveDate> {
    value.as_deref().and_then(parse_date)
}

/// End must not precede start when both are known
fn ordered(start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => end >= start,
        _ => true,
    }
}

/// Stable sort on position (unpositioned stages keep input order, last), then renumber from 1
pub fn normalize_stages(drafts: &[StageDraft]) -> Vec<Stage> {
    let mut ordered: Vec<&StageDraft> = drafts.iter().collect();
    ordered.sort_by_key(|stage| (stage.position.is_none(), stage.position));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, stage)| Stage {
            name: stage
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
            description: stage.description.clone(),
            start_date: date(&stage.start_date),
            end_date: date(&stage.end_date),
            position: index as u32 + 1,
        })
        .collect()
}

fn stage_items(stages: &[Stage]) -> [ChecklistItem; 2] {
    [
        item("stages", "At least one stage", !stages.is_empty()),
        item(
            "stageNames",
            "Every stage has a name",
            stages.iter().all(|s| s.name.is_some()),
        ),
    ]
}

pub fn check_event(draft: &EventDraft) -> PublishChecklist {
    let start = date(&draft.start_date);
    let end = date(&draft.end_date);
    let online = draft
        .mode
        .as_deref()
        .is_some_and(|m| m.trim().eq_ignore_ascii_case("online"));
    let stages = normalize_stages(&draft.stages);

    let mut items = vec![
        item("title", "Title", filled(&draft.title)),
        item("description", "Description", filled(&draft.description)),
        item("startDate", "Start date", start.is_some()),
        item("endDate", "End date", end.is_some()),
        item("dateOrder", "End date is not before start date", ordered(start, end)),
        item("venue", "Location or online mode", online || filled(&draft.location)),
    ];
    items.extend(stage_items(&stages));

    let checklist = PublishChecklist::from_items(items);
    record_publish_check("event", checklist.publishable);
    checklist
}

pub fn check_scholarship(draft: &ScholarshipDraft) -> PublishChecklist {
    let opens = date(&draft.application_start);
    let closes = date(&draft.application_deadline);
    let benefits = draft.amount.is_some_and(|a| a > 0.0) || filled(&draft.benefits);
    let eligibility = draft.eligibility.iter().any(|c| !c.trim().is_empty());
    let stages = normalize_stages(&draft.stages);

    let mut items = vec![
        item("title", "Title", filled(&draft.title)),
        item("description", "Description", filled(&draft.description)),
        item("provider", "Provider", filled(&draft.provider)),
        item("benefits", "Award amount or benefits", benefits),
        item("applicationStart", "Application start date", opens.is_some()),
        item("applicationDeadline", "Application deadline", closes.is_some()),
        item("dateOrder", "Deadline is not before start date", ordered(opens, closes)),
        item("eligibility", "At least one eligibility criterion", eligibility),
    ];
    items.extend(stage_items(&stages));

    let checklist = PublishChecklist::from_items(items);
    record_publish_check("scholarship", checklist.publishable);
    checklist
}

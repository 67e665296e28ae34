//! Publish checklist handlers

use acado_common::{
    errors::Result,
    services::{check_event, check_scholarship, EventDraft, PublishChecklist, ScholarshipDraft},
};
use axum::{extract::rejection::JsonRejection, Json};

/// Evaluate an event draft against the publish checklist
pub async fn event_publish_check(
    body: std::result::Result<Json<EventDraft>, JsonRejection>,
) -> Result<Json<PublishChecklist>> {
    let Json(draft) = body?;
    Ok(Json(check_event(&draft)))
}

pub async fn scholarship_publish_check(
    body: std::result::Result<Json<ScholarshipDraft>, JsonRejection>,
) -> Result<Json<PublishChecklist>> {
    let Json(draft) = body?;
    Ok(Json(check_scholarship(&draft)))
}

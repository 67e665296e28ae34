//! University handlers
//!
//! Path ids are taken as strings so a malformed id reaches the service
//! and comes back as the same 404 as an unknown one.

use crate::AppState;
use acado_common::{
    auth::Actor,
    db::query::Paginated,
    errors::Result,
    services::{
        CourseSummary, CreateUniversityRequest, UniversityDetail, UniversityListParams,
        UniversityStats, UniversitySummary, UpdateUniversityRequest,
    },
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

/// List universities with filters and pagination
pub async fn list_universities(
    State(state): State<AppState>,
    query: std::result::Result<Query<UniversityListParams>, QueryRejection>,
) -> Result<Json<Paginated<UniversitySummary>>> {
    let Query(params) = query?;
    let page = state.services.universities.list(&params).await?;
    Ok(Json(page))
}

pub async fn get_university(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UniversityDetail>> {
    let university = state.services.universities.get_by_id(&id).await?;
    Ok(Json(university))
}

/// Create a university; the actor is stamped as creator
pub async fn create_university(
    State(state): State<AppState>,
    actor: Actor,
    body: std::result::Result<Json<CreateUniversityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UniversityDetail>)> {
    let Json(request) = body?;
    let university = state
        .services
        .universities
        .create(request, actor.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(university)))
}

/// Partial update, served for both PUT and PATCH
pub async fn update_university(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateUniversityRequest>, JsonRejection>,
) -> Result<Json<UniversityDetail>> {
    let Json(request) = body?;
    let university = state.services.universities.update(&id, request).await?;
    Ok(Json(university))
}

/// 204 on success, 409 while courses reference the university
pub async fn delete_university(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.services.universities.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn university_stats(State(state): State<AppState>) -> Result<Json<UniversityStats>> {
    let stats = state.services.universities.stats().await?;
    Ok(Json(stats))
}

pub async fn university_courses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CourseSummary>>> {
    let courses = state.services.universities.courses_of(&id).await?;
    Ok(Json(courses))
}

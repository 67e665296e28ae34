//! Course handlers

use crate::AppState;
use acado_common::{
    auth::Actor,
    db::query::Paginated,
    errors::Result,
    services::{
        CourseDetail, CourseListParams, CourseSummary, CreateCourseRequest, UpdateCourseRequest,
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

pub async fn list_courses(
    State(state): State<AppState>,
    query: std::result::Result<Query<CourseListParams>, QueryRejection>,
) -> Result<Json<Paginated<CourseSummary>>> {
    let Query(params) = query?;
    let page = state.services.courses.list(&params).await?;
    Ok(Json(page))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CourseDetail>> {
    let course = state.services.courses.get_by_id(&id).await?;
    Ok(Json(course))
}

pub async fn create_course(
    State(state): State<AppState>,
    actor: Actor,
    body: std::result::Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CourseDetail>)> {
    let Json(request) = body?;
    let course = state.services.courses.create(request, actor.user_id).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> Result<Json<CourseDetail>> {
    let Json(request) = body?;
    let course = state.services.courses.update(&id, request).await?;
    Ok(Json(course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.services.courses.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

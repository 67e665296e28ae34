//! Application form, field and category handlers

use crate::AppState;
use acado_common::{
    auth::Actor,
    db::query::Paginated,
    errors::Result,
    services::{
        AddFieldRequest, CategoryNode, CategoryView, CreateCategoryRequest, CreateFormRequest,
        FieldView, FormDetail, FormListParams, FormView, ReorderFieldsRequest, UpdateFieldRequest,
        UpdateFormRequest,
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

// ============================================================================
// Forms
// ============================================================================

pub async fn list_forms(
    State(state): State<AppState>,
    query: std::result::Result<Query<FormListParams>, QueryRejection>,
) -> Result<Json<Paginated<FormView>>> {
    let Query(params) = query?;
    let page = state.services.forms.list_forms(&params).await?;
    Ok(Json(page))
}

pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FormDetail>> {
    let form = state.services.forms.get_form(&id).await?;
    Ok(Json(form))
}

pub async fn create_form(
    State(state): State<AppState>,
    actor: Actor,
    body: std::result::Result<Json<CreateFormRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FormDetail>)> {
    let Json(request) = body?;
    let form = state.services.forms.create_form(request, actor.user_id).await?;
    Ok((StatusCode::CREATED, Json(form)))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateFormRequest>, JsonRejection>,
) -> Result<Json<FormDetail>> {
    let Json(request) = body?;
    let form = state.services.forms.update_form(&id, request).await?;
    Ok(Json(form))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.services.forms.delete_form(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn publish_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FormDetail>> {
    let form = state.services.forms.publish(&id).await?;
    Ok(Json(form))
}

pub async fn archive_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FormDetail>> {
    let form = state.services.forms.archive(&id).await?;
    Ok(Json(form))
}

// ============================================================================
// Fields
// ============================================================================

pub async fn add_field(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    body: std::result::Result<Json<AddFieldRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FieldView>)> {
    let Json(request) = body?;
    let field = state.services.forms.add_field(&form_id, request).await?;
    Ok((StatusCode::CREATED, Json(field)))
}

pub async fn update_field(
    State(state): State<AppState>,
    Path((form_id, field_id)): Path<(String, String)>,
    body: std::result::Result<Json<UpdateFieldRequest>, JsonRejection>,
) -> Result<Json<FieldView>> {
    let Json(request) = body?;
    let field = state
        .services
        .forms
        .update_field(&form_id, &field_id, request)
        .await?;
    Ok(Json(field))
}

pub async fn remove_field(
    State(state): State<AppState>,
    Path((form_id, field_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    state.services.forms.remove_field(&form_id, &field_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_fields(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    body: std::result::Result<Json<ReorderFieldsRequest>, JsonRejection>,
) -> Result<Json<FormDetail>> {
    let Json(request) = body?;
    let form = state.services.forms.reorder_fields(&form_id, request).await?;
    Ok(Json(form))
}

// ============================================================================
// Categories
// ============================================================================

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryNode>>> {
    let categories = state.services.forms.list_categories().await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>)> {
    let Json(request) = body?;
    let category = state.services.forms.create_category(request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.services.forms.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

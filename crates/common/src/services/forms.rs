//! Application forms
//!
//! Categories form a two-level tree. A form owns an ordered list of
//! fields and moves through draft -> published -> archived; archived
//! forms are read-only.

use crate::db::models::*;
use crate::db::query::{PageRequest, Paginated};
use crate::db::{FormRepository, Repositories, UniversityRepository};
use crate::errors::{AppError, Result};
use crate::metrics::record_form_transition;
use crate::services::input::{
    deserialize_some, lenient, non_blank, parse_id, reference, reference_update, text_update,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormListParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub parent_id: Option<String>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub university_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub university_id: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddFieldRequest {
    #[validate(length(min = 1, max = 300))]
    pub label: String,
    /// Derived from the label when absent
    #[validate(length(max = 100))]
    pub key: Option<String>,
    pub field_type: String,
    pub category_id: String,
    pub subcategory_id: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldRequest {
    #[validate(length(min = 1, max = 300))]
    pub label: Option<String>,
    #[validate(length(max = 100))]
    pub key: Option<String>,
    pub field_type: Option<String>,
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub subcategory_id: Option<Option<String>>,
    pub required: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub placeholder: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub help_text: Option<Option<String>>,
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderFieldsRequest {
    pub field_ids: Vec<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub position: i32,
    pub is_active: bool,
}

impl From<&FormCategory> for CategoryView {
    fn from(c: &FormCategory) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            parent_id: c.parent_id,
            position: c.position,
            is_active: c.is_active,
        }
    }
}

/// Top-level category with its ordered subcategories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: CategoryView,
    pub subcategories: Vec<CategoryView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub id: Uuid,
    pub form_id: Uuid,
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub label: String,
    pub key: String,
    pub field_type: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub options: Vec<String>,
    pub position: i32,
}

impl From<&FormField> for FieldView {
    fn from(f: &FormField) -> Self {
        Self {
            id: f.id,
            form_id: f.form_id,
            category_id: f.category_id,
            subcategory_id: f.subcategory_id,
            label: f.label.clone(),
            key: f.key.clone(),
            field_type: f.field_type.clone(),
            required: f.required,
            placeholder: f.placeholder.clone(),
            help_text: f.help_text.clone(),
            options: f.option_list(),
            position: f.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub university_id: Option<Uuid>,
    pub status: String,
    pub is_active: bool,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub archived_at: Option<DateTime<FixedOffset>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<&ApplicationForm> for FormView {
    fn from(f: &ApplicationForm) -> Self {
        Self {
            id: f.id,
            title: f.title.clone(),
            description: f.description.clone(),
            university_id: f.university_id,
            status: f.status.clone(),
            is_active: f.is_active,
            published_at: f.published_at,
            archived_at: f.archived_at,
            created_by: f.created_by,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDetail {
    #[serde(flatten)]
    pub form: FormView,
    pub fields: Vec<FieldView>,
}

impl FormDetail {
    fn new(form: &ApplicationForm, fields: &[FormField]) -> Self {
        Self {
            form: FormView::from(form),
            fields: fields.iter().map(FieldView::from).collect(),
        }
    }
}

// ============================================================================
// Field rules
// ============================================================================

/// Lower-case `[a-z0-9_]` key; runs of other characters become one underscore
pub fn field_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            key.push(ch.to_ascii_lowercase());
        } else if !key.is_empty() && !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_end_matches('_').to_string()
}

/// Choice widgets need distinct, non-blank options; other widgets carry none
pub fn field_options(kind: FieldType, raw: Vec<String>) -> Result<Vec<String>> {
    if !kind.requires_options() {
        return Ok(Vec::new());
    }

    let options: Vec<String> = raw
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if options.is_empty() {
        return Err(AppError::validation(
            "options",
            format!("A {} field needs at least one option", kind.as_str()),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = options.iter().find(|o| !seen.insert(o.as_str())) {
        return Err(AppError::validation(
            "options",
            format!("Duplicate option: {}", duplicate),
        ));
    }

    Ok(options)
}

fn parse_field_type(raw: &str) -> Result<FieldType> {
    FieldType::parse(raw).ok_or_else(|| {
        AppError::validation("fieldType", format!("Unknown field type: {}", raw))
    })
}

fn ensure_editable(form: &ApplicationForm) -> Result<()> {
    if form.is_archived() {
        return Err(AppError::Conflict {
            message: format!("Form {} is archived and read-only", form.id),
        });
    }
    Ok(())
}

// ============================================================================
// Service
// ============================================================================

#[derive(Clone)]
pub struct FormService {
    forms: Arc<dyn FormRepository>,
    universities: Arc<dyn UniversityRepository>,
}

impl FormService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            forms: repos.forms.clone(),
            universities: repos.universities.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn list_categories(&self) -> Result<Vec<CategoryNode>> {
        let categories = self.forms.list_categories().await?;
        let top_level: HashSet<Uuid> = categories
            .iter()
            .filter(|c| !c.is_subcategory())
            .map(|c| c.id)
            .collect();

        // Subcategories whose parent vanished are listed at the top level
        let mut nodes: Vec<CategoryNode> = categories
            .iter()
            .filter(|c| c.parent_id.map_or(true, |p| !top_level.contains(&p)))
            .map(|c| CategoryNode {
                category: CategoryView::from(c),
                subcategories: Vec::new(),
            })
            .collect();

        for category in &categories {
            if let Some(parent_id) = category.parent_id {
                if let Some(node) = nodes.iter_mut().find(|n| n.category.id == parent_id) {
                    node.subcategories.push(CategoryView::from(category));
                }
            }
        }

        Ok(nodes)
    }

    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<CategoryView> {
        request.validate()?;
        let name = non_blank(Some(request.name))
            .ok_or_else(|| AppError::validation("name", "Name must not be blank"))?;

        let parent_id = match non_blank(request.parent_id) {
            Some(raw) => {
                let parent = match parse_id(&raw) {
                    Some(id) => self.forms.find_category(id).await?,
                    None => None,
                };
                match parent {
                    Some(parent) if !parent.is_subcategory() => Some(parent.id),
                    Some(_) => {
                        return Err(AppError::validation(
                            "parentId",
                            "Subcategories cannot have children",
                        ))
                    }
                    None => {
                        return Err(AppError::validation(
                            "parentId",
                            format!("Category {} does not exist", raw),
                        ))
                    }
                }
            }
            None => None,
        };

        let position = match request.position {
            Some(position) => position.max(0),
            None => self
                .forms
                .list_categories()
                .await?
                .iter()
                .filter(|c| c.parent_id == parent_id)
                .count() as i32,
        };

        let category = FormCategory {
            id: Uuid::new_v4(),
            name,
            parent_id,
            position,
            is_active: request.is_active.unwrap_or(true),
            created_at: Utc::now().into(),
        };

        let category = self.forms.insert_category(category).await?;
        info!(category_id = %category.id, parent_id = ?category.parent_id, "Form category created");

        Ok(CategoryView::from(&category))
    }

    /// Conflict while subcategories or fields reference the category
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        let category = match parse_id(id) {
            Some(parsed) => self.forms.find_category(parsed).await?,
            None => None,
        }
        .ok_or_else(|| AppError::not_found("FormCategory", id))?;

        let children = self
            .forms
            .list_categories()
            .await?
            .iter()
            .filter(|c| c.parent_id == Some(category.id))
            .count();
        if children > 0 {
            return Err(AppError::Conflict {
                message: format!("Category {} has {} subcategories", category.id, children),
            });
        }

        let fields = self.forms.count_fields_in_category(category.id).await?;
        if fields > 0 {
            return Err(AppError::Conflict {
                message: format!("Category {} is used by {} field(s)", category.id, fields),
            });
        }

        self.forms.delete_category(category.id).await?;
        info!(category_id = %category.id, "Form category deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Forms
    // ------------------------------------------------------------------

    pub async fn list_forms(&self, params: &FormListParams) -> Result<Paginated<FormView>> {
        let status = lenient("status", params.status.as_deref(), FormStatus::parse);
        let page = PageRequest::clamped(params.page, params.page_size);
        debug!(?status, page = page.page, page_size = page.page_size, "Listing forms");

        let (forms, total) = self.forms.list_forms(status, page).await?;

        Ok(Paginated {
            items: forms.iter().map(FormView::from).collect(),
            pagination: page.meta(total),
        })
    }

    pub async fn get_form(&self, id: &str) -> Result<FormDetail> {
        let form = self.find_form(id).await?;
        let fields = self.forms.list_fields(form.id).await?;
        Ok(FormDetail::new(&form, &fields))
    }

    pub async fn create_form(
        &self,
        request: CreateFormRequest,
        actor: Option<Uuid>,
    ) -> Result<FormDetail> {
        request.validate()?;
        let title = non_blank(Some(request.title))
            .ok_or_else(|| AppError::validation("title", "Title must not be blank"))?;

        let university_id = reference("universityId", request.university_id.as_deref());
        if let Some(university_id) = university_id {
            self.require_university(university_id).await?;
        }

        let now = Utc::now().into();
        let form = ApplicationForm {
            id: Uuid::new_v4(),
            title,
            description: non_blank(request.description),
            university_id,
            status: FormStatus::Draft.as_str().to_string(),
            is_active: true,
            published_at: None,
            archived_at: None,
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        let form = self.forms.insert_form(form).await?;
        info!(form_id = %form.id, title = %form.title, "Application form created");

        Ok(FormDetail::new(&form, &[]))
    }

    pub async fn update_form(&self, id: &str, request: UpdateFormRequest) -> Result<FormDetail> {
        request.validate()?;
        let mut form = self.find_form(id).await?;
        ensure_editable(&form)?;

        if let Some(title) = request.title {
            form.title = non_blank(Some(title))
                .ok_or_else(|| AppError::validation("title", "Title must not be blank"))?;
        }
        if let Some(description) = text_update(request.description) {
            form.description = description;
        }
        if let Some(university_id) = reference_update("universityId", request.university_id) {
            if let Some(university_id) = university_id {
                self.require_university(university_id).await?;
            }
            form.university_id = university_id;
        }
        form.updated_at = Utc::now().into();

        let form = self.forms.save_form(form).await?;
        info!(form_id = %form.id, "Application form updated");

        let fields = self.forms.list_fields(form.id).await?;
        Ok(FormDetail::new(&form, &fields))
    }

    /// Requires at least one field
    pub async fn publish(&self, id: &str) -> Result<FormDetail> {
        self.transition(id, FormStatus::Published).await
    }

    /// Archived forms are inactive and read-only
    pub async fn archive(&self, id: &str) -> Result<FormDetail> {
        self.transition(id, FormStatus::Archived).await
    }

    /// Removes the form and its fields
    pub async fn delete_form(&self, id: &str) -> Result<()> {
        let form = self.find_form(id).await?;

        if !self.forms.delete_form(form.id).await? {
            return Err(AppError::not_found("ApplicationForm", form.id.to_string()));
        }

        info!(form_id = %form.id, "Application form deleted");
        Ok(())
    }

    async fn transition(&self, id: &str, next: FormStatus) -> Result<FormDetail> {
        let mut form = self.find_form(id).await?;
        let current = form.form_status();

        if !current.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                resource_type: "ApplicationForm".to_string(),
                from: current.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }

        let fields = self.forms.list_fields(form.id).await?;
        let now = Utc::now().into();

        match next {
            FormStatus::Published => {
                if fields.is_empty() {
                    return Err(AppError::Conflict {
                        message: format!("Form {} has no fields to publish", form.id),
                    });
                }
                form.published_at = Some(now);
            }
            FormStatus::Archived => {
                form.archived_at = Some(now);
                form.is_active = false;
            }
            FormStatus::Draft => {}
        }
        form.status = next.as_str().to_string();
        form.updated_at = now;

        let form = self.forms.save_form(form).await?;
        record_form_transition(next.as_str());
        info!(
            form_id = %form.id,
            from = current.as_str(),
            to = next.as_str(),
            "Form status changed"
        );

        Ok(FormDetail::new(&form, &fields))
    }

    // ------------------------------------------------------------------
    // Fields
    // ------------------------------------------------------------------

    /// Appends the field after the existing ones
    pub async fn add_field(&self, form_id: &str, request: AddFieldRequest) -> Result<FieldView> {
        request.validate()?;
        let form = self.find_form(form_id).await?;
        ensure_editable(&form)?;

        let label = non_blank(Some(request.label))
            .ok_or_else(|| AppError::validation("label", "Label must not be blank"))?;
        let kind = parse_field_type(&request.field_type)?;
        let options = field_options(kind, request.options)?;
        let (category_id, subcategory_id) = self
            .resolve_categories(&request.category_id, request.subcategory_id.as_deref())
            .await?;

        let key = match non_blank(request.key) {
            Some(key) => field_key(&key),
            None => field_key(&label),
        };
        if key.is_empty() {
            return Err(AppError::validation("key", "Field key must contain letters or digits"));
        }

        let fields = self.forms.list_fields(form.id).await?;
        if fields.iter().any(|f| f.key == key) {
            return Err(AppError::Conflict {
                message: format!("Field key '{}' already exists on form {}", key, form.id),
            });
        }

        let now = Utc::now().into();
        let field = FormField {
            id: Uuid::new_v4(),
            form_id: form.id,
            category_id,
            subcategory_id,
            label,
            key,
            field_type: kind.as_str().to_string(),
            required: request.required,
            placeholder: non_blank(request.placeholder),
            help_text: non_blank(request.help_text),
            options: Value::from(options),
            position: fields.len() as i32,
            created_at: now,
            updated_at: now,
        };

        let field = self.forms.insert_field(field).await?;
        info!(form_id = %form.id, field_id = %field.id, key = %field.key, "Form field added");

        Ok(FieldView::from(&field))
    }

    pub async fn update_field(
        &self,
        form_id: &str,
        field_id: &str,
        request: UpdateFieldRequest,
    ) -> Result<FieldView> {
        request.validate()?;
        let form = self.find_form(form_id).await?;
        ensure_editable(&form)?;
        let mut field = self.find_field(&form, field_id).await?;

        if let Some(label) = request.label {
            field.label = non_blank(Some(label))
                .ok_or_else(|| AppError::validation("label", "Label must not be blank"))?;
        }

        if let Some(raw) = request.key {
            let key = field_key(&raw);
            if key.is_empty() {
                return Err(AppError::validation("key", "Field key must contain letters or digits"));
            }
            let taken = self
                .forms
                .list_fields(form.id)
                .await?
                .iter()
                .any(|f| f.id != field.id && f.key == key);
            if taken {
                return Err(AppError::Conflict {
                    message: format!("Field key '{}' already exists on form {}", key, form.id),
                });
            }
            field.key = key;
        }

        let kind = match request.field_type {
            Some(raw) => parse_field_type(&raw)?,
            None => field.kind(),
        };
        let options = request.options.unwrap_or_else(|| field.option_list());
        field.field_type = kind.as_str().to_string();
        field.options = Value::from(field_options(kind, options)?);

        if request.category_id.is_some() || request.subcategory_id.is_some() {
            let category_raw = request
                .category_id
                .unwrap_or_else(|| field.category_id.to_string());
            let category_changed = parse_id(&category_raw) != Some(field.category_id);

            let subcategory_raw = match request.subcategory_id {
                Some(sub) => sub,
                None if category_changed => None,
                None => field.subcategory_id.map(|s| s.to_string()),
            };

            let (category_id, subcategory_id) = self
                .resolve_categories(&category_raw, subcategory_raw.as_deref())
                .await?;
            field.category_id = category_id;
            field.subcategory_id = subcategory_id;
        }

        if let Some(required) = request.required {
            field.required = required;
        }
        if let Some(placeholder) = text_update(request.placeholder) {
            field.placeholder = placeholder;
        }
        if let Some(help_text) = text_update(request.help_text) {
            field.help_text = help_text;
        }
        field.updated_at = Utc::now().into();

        let field = self.forms.save_field(field).await?;
        info!(form_id = %form.id, field_id = %field.id, "Form field updated");

        Ok(FieldView::from(&field))
    }

    /// Remaining fields keep their order with positions compacted to `0..n`
    pub async fn remove_field(&self, form_id: &str, field_id: &str) -> Result<()> {
        let form = self.find_form(form_id).await?;
        ensure_editable(&form)?;
        let field = self.find_field(&form, field_id).await?;

        self.forms.delete_field(field.id).await?;

        let remaining = self.forms.list_fields(form.id).await?;
        self.write_positions(remaining).await?;

        info!(form_id = %form.id, field_id = %field.id, "Form field removed");
        Ok(())
    }

    /// `field_ids` must be an exact permutation of the form's fields
    pub async fn reorder_fields(
        &self,
        form_id: &str,
        request: ReorderFieldsRequest,
    ) -> Result<FormDetail> {
        let form = self.find_form(form_id).await?;
        ensure_editable(&form)?;
        let mut fields = self.forms.list_fields(form.id).await?;

        let mut order = Vec::with_capacity(request.field_ids.len());
        for raw in &request.field_ids {
            let id = parse_id(raw).ok_or_else(|| {
                AppError::validation("fieldIds", format!("Invalid field id: {}", raw))
            })?;
            order.push(id);
        }

        let requested: HashSet<Uuid> = order.iter().copied().collect();
        let current: HashSet<Uuid> = fields.iter().map(|f| f.id).collect();
        if requested.len() != order.len() || order.len() != fields.len() || requested != current {
            return Err(AppError::validation(
                "fieldIds",
                "Field order must list every field of the form exactly once",
            ));
        }

        fields.sort_by_key(|f| order.iter().position(|id| *id == f.id));
        let fields = self.write_positions(fields).await?;

        info!(form_id = %form.id, fields = fields.len(), "Form fields reordered");
        Ok(FormDetail::new(&form, &fields))
    }

    /// Persist `position = index` for every field whose position changed
    async fn write_positions(&self, fields: Vec<FormField>) -> Result<Vec<FormField>> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let mut written = Vec::with_capacity(fields.len());

        for (index, mut field) in fields.into_iter().enumerate() {
            let position = index as i32;
            if field.position != position {
                field.position = position;
                field.updated_at = now;
                field = self.forms.save_field(field).await?;
            }
            written.push(field);
        }

        Ok(written)
    }

    async fn find_form(&self, id: &str) -> Result<ApplicationForm> {
        let parsed = parse_id(id).ok_or_else(|| AppError::not_found("ApplicationForm", id))?;

        self.forms
            .find_form(parsed)
            .await?
            .ok_or_else(|| AppError::not_found("ApplicationForm", id))
    }

    /// A field id that belongs to another form is NotFound
    async fn find_field(&self, form: &ApplicationForm, id: &str) -> Result<FormField> {
        let field = match parse_id(id) {
            Some(parsed) => self.forms.find_field(parsed).await?,
            None => None,
        };

        field
            .filter(|f| f.form_id == form.id)
            .ok_or_else(|| AppError::not_found("FormField", id))
    }

    /// The category must exist; a subcategory must be one of its children
    async fn resolve_categories(
        &self,
        category_raw: &str,
        subcategory_raw: Option<&str>,
    ) -> Result<(Uuid, Option<Uuid>)> {
        let category = match parse_id(category_raw) {
            Some(id) => self.forms.find_category(id).await?,
            None => None,
        }
        .ok_or_else(|| {
            AppError::validation("categoryId", format!("Category {} does not exist", category_raw))
        })?;

        let subcategory_raw = match subcategory_raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok((category.id, None)),
        };

        let subcategory = match parse_id(subcategory_raw) {
            Some(id) => self.forms.find_category(id).await?,
            None => None,
        };

        match subcategory {
            Some(sub) if sub.parent_id == Some(category.id) => Ok((category.id, Some(sub.id))),
            Some(_) => Err(AppError::validation(
                "subcategoryId",
                format!("Category {} is not a subcategory of {}", subcategory_raw, category.id),
            )),
            None => Err(AppError::validation(
                "subcategoryId",
                format!("Category {} does not exist", subcategory_raw),
            )),
        }
    }

    async fn require_university(&self, university_id: Uuid) -> Result<()> {
        match self.universities.find_by_id(university_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::validation(
                "universityId",
                format!("University {} does not exist", university_id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_key() {
        assert_eq!(field_key("Full Name"), "full_name");
        assert_eq!(field_key("  Date of birth (DOB) "), "date_of_birth_dob");
        assert_eq!(field_key("already_snake"), "already_snake");
        assert_eq!(field_key("???"), "");
    }

    #[test]
    fn test_choice_fields_need_options() {
        let err = field_options(FieldType::Select, vec!["  ".into()]).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = field_options(FieldType::Radio, vec!["Yes".into(), " Yes".into()]).unwrap_err();
        assert!(err.to_string().contains("Duplicate option"));

        let options = field_options(FieldType::Multiselect, vec![" A ".into(), "B".into()]).unwrap();
        assert_eq!(options, vec!["A", "B"]);
    }

    #[test]
    fn test_other_fields_drop_options() {
        let options = field_options(FieldType::Text, vec!["ignored".into()]).unwrap();
        assert!(options.is_empty());
    }
}

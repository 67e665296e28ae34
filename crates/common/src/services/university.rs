//! University service
//!
//! Turns caller-supplied filters and bodies into normalised queries and
//! patches, enforces the course reference rule on delete, and shapes
//! documents into summary and detail views.

use crate::db::models::*;
use crate::db::patch::UniversityPatch;
use crate::db::query::{PageRequest, Paginated, ParentFilter, UniversityGroupKey, UniversityQuery};
use crate::db::{CourseRepository, Repositories, UniversityRepository};
use crate::errors::{AppError, Result};
use crate::metrics::{record_delete_conflict, record_university_mutation};
use crate::services::course::CourseSummary;
use crate::services::input::{
    deserialize_some, dropped, lenient, non_blank, parse_flag, parse_id, reference,
    reference_update, text_update,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

/// Countries reported by `stats`
pub const TOP_COUNTRIES: usize = 10;

/// Group key used for absent or empty values in stats
pub const UNKNOWN_GROUP: &str = "Unknown";

// ============================================================================
// Requests
// ============================================================================

/// Raw list filters as they arrive on the query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityListParams {
    pub search: Option<String>,
    pub country: Option<String>,
    pub institution_type: Option<String>,
    pub organization_id: Option<String>,
    pub parent_institution_id: Option<String>,
    pub is_active: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl UniversityListParams {
    /// Keep only the provided, valid filters
    pub fn normalize(&self) -> (UniversityQuery, PageRequest) {
        let parent = self.parent_institution_id.as_deref().and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw == "null" {
                Some(ParentFilter::Root)
            } else {
                lenient("parentInstitutionId", Some(raw), parse_id).map(ParentFilter::Is)
            }
        });

        let query = UniversityQuery {
            search: non_blank(self.search.clone()).map(|s| s.to_lowercase()),
            country: non_blank(self.country.clone()),
            institution_type: lenient(
                "institutionType",
                self.institution_type.as_deref(),
                InstitutionType::parse,
            ),
            organization_id: lenient("organizationId", self.organization_id.as_deref(), parse_id),
            parent,
            is_active: lenient("isActive", self.is_active.as_deref(), parse_flag),
            status: lenient("status", self.status.as_deref(), UniversityStatus::parse),
        };

        (query, PageRequest::clamped(self.page, self.page_size))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BrandingInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub logo_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub banner_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub website_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32))]
    pub primary_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32))]
    pub secondary_color: Option<String>,
}

impl BrandingInput {
    fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Into::into)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub campuses: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub country: Option<Option<String>>,
    pub campuses: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tags {
    pub is_verified: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsInput {
    pub is_verified: Option<bool>,
}

/// Body of `POST /universities`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUniversityRequest {
    #[validate(length(min = 1, max = 300))]
    pub name: String,

    #[validate(length(max = 50))]
    pub short_name: Option<String>,

    #[validate(length(max = 500))]
    pub tagline: Option<String>,

    pub institution_type: Option<String>,
    pub organization_id: Option<String>,
    pub organization_level: Option<String>,
    pub parent_institution_id: Option<String>,
    pub status: Option<String>,

    #[serde(default)]
    pub location: LocationInput,

    #[validate(nested)]
    pub branding: Option<BrandingInput>,

    pub about: Option<Value>,
    pub community: Option<Value>,
    pub facts_and_figures: Option<Value>,
    pub rankings: Option<Vec<Value>>,
    pub accreditations: Option<Vec<Value>>,
    pub admission_info: Option<Value>,

    #[serde(default)]
    pub tags: TagsInput,

    pub is_active: Option<bool>,
}

/// Body of `PUT`/`PATCH /universities/{id}`; only supplied fields are touched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUniversityRequest {
    #[validate(length(min = 1, max = 300))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub short_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub tagline: Option<Option<String>>,

    pub institution_type: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub organization_id: Option<Option<String>>,

    pub organization_level: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent_institution_id: Option<Option<String>>,

    pub status: Option<String>,

    pub location: Option<LocationUpdate>,

    #[validate(nested)]
    pub branding: Option<BrandingInput>,

    pub about: Option<Value>,
    pub community: Option<Value>,
    pub facts_and_figures: Option<Value>,
    pub rankings: Option<Vec<Value>>,
    pub accreditations: Option<Vec<Value>>,
    pub admission_info: Option<Value>,

    pub tags: Option<TagsInput>,

    pub is_active: Option<bool>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub campuses: Value,
}

impl Location {
    fn of(university: &University) -> Self {
        Self {
            city: university.city.clone(),
            state: university.state.clone(),
            country: university.country.clone(),
            campuses: university.campuses.clone(),
        }
    }
}

/// List entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversitySummary {
    pub id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub tagline: Option<String>,
    pub institution_type: Option<String>,
    pub organization_id: Option<Uuid>,
    pub organization_level: Option<String>,
    pub parent_institution_id: Option<Uuid>,
    pub status: String,
    pub location: Location,
    pub branding: Value,
    pub tags: Tags,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<&University> for UniversitySummary {
    fn from(u: &University) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            short_name: u.short_name.clone(),
            tagline: u.tagline.clone(),
            institution_type: u.institution_type.clone(),
            organization_id: u.organization_id,
            organization_level: u.organization_level.clone(),
            parent_institution_id: u.parent_institution_id,
            status: u.status.clone(),
            location: Location::of(u),
            branding: u.branding.clone(),
            tags: Tags {
                is_verified: u.is_verified,
            },
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Reduced view of a parent institution embedded in a detail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentSummary {
    pub id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub institution_type: Option<String>,
    pub location: Location,
}

impl From<&University> for ParentSummary {
    fn from(u: &University) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            short_name: u.short_name.clone(),
            institution_type: u.institution_type.clone(),
            location: Location::of(u),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityDetail {
    #[serde(flatten)]
    pub summary: UniversitySummary,
    pub about: Value,
    pub community: Value,
    pub facts_and_figures: Value,
    pub rankings: Value,
    pub accreditations: Value,
    pub admission_info: Value,
    pub created_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentSummary>,
}

impl UniversityDetail {
    fn new(university: &University, parent: Option<&University>) -> Self {
        Self {
            summary: UniversitySummary::from(university),
            about: university.about.clone(),
            community: university.community.clone(),
            facts_and_figures: university.facts_and_figures.clone(),
            rankings: university.rankings.clone(),
            accreditations: university.accreditations.clone(),
            admission_info: university.admission_info.clone(),
            created_by: university.created_by,
            parent: parent.map(ParentSummary::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub by_institution_type: Vec<GroupCount>,
    pub top_countries: Vec<GroupCount>,
}

/// Merge absent/empty keys under `Unknown`, sort by count desc then key asc
fn rank_groups(raw: Vec<(Option<String>, u64)>, limit: Option<usize>) -> Vec<GroupCount> {
    let mut merged: BTreeMap<String, u64> = BTreeMap::new();
    for (key, count) in raw {
        let key = non_blank(key).unwrap_or_else(|| UNKNOWN_GROUP.to_string());
        *merged.entry(key).or_default() += count;
    }

    let mut groups: Vec<GroupCount> = merged
        .into_iter()
        .map(|(key, count)| GroupCount { key, count })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));

    if let Some(limit) = limit {
        groups.truncate(limit);
    }
    groups
}

fn json_array(values: Option<Vec<Value>>) -> Value {
    Value::Array(values.unwrap_or_default())
}

fn json_object(value: Option<Value>) -> Value {
    match value {
        Some(Value::Null) | None => json!({}),
        Some(value) => value,
    }
}

// ============================================================================
// Service
// ============================================================================

#[derive(Clone)]
pub struct UniversityService {
    universities: Arc<dyn UniversityRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl UniversityService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            universities: repos.universities.clone(),
            courses: repos.courses.clone(),
        }
    }

    /// Filtered, paginated summaries
    pub async fn list(
        &self,
        params: &UniversityListParams,
    ) -> Result<Paginated<UniversitySummary>> {
        let (query, page) = params.normalize();
        debug!(?query, page = page.page, page_size = page.page_size, "Listing universities");

        let (universities, total) = self.universities.list(&query, page).await?;

        Ok(Paginated {
            items: universities.iter().map(UniversitySummary::from).collect(),
            pagination: page.meta(total),
        })
    }

    /// Detail view; malformed and unknown ids are both NotFound
    pub async fn get_by_id(&self, id: &str) -> Result<UniversityDetail> {
        let university = self.find(id).await?;
        self.detail(&university).await
    }

    pub async fn create(
        &self,
        request: CreateUniversityRequest,
        actor: Option<Uuid>,
    ) -> Result<UniversityDetail> {
        request.validate()?;
        let name = non_blank(Some(request.name))
            .ok_or_else(|| AppError::validation("name", "Name must not be blank"))?;

        let id = Uuid::new_v4();
        let parent_candidate = reference(
            "parentInstitutionId",
            request.parent_institution_id.as_deref(),
        );
        let parent_institution_id = self.existing_parent(parent_candidate, id).await?;

        let status = match request.status.as_deref() {
            None => UniversityStatus::default(),
            Some(raw) => UniversityStatus::parse(raw).unwrap_or_else(|| {
                dropped("status", raw);
                UniversityStatus::default()
            }),
        };

        let branding = match &request.branding {
            Some(branding) => branding.to_value()?,
            None => json!({}),
        };

        let now = Utc::now().into();
        let university = University {
            id,
            name,
            short_name: non_blank(request.short_name),
            tagline: non_blank(request.tagline),
            institution_type: lenient(
                "institutionType",
                request.institution_type.as_deref(),
                InstitutionType::parse,
            )
            .map(|t| t.as_str().to_string()),
            organization_id: reference("organizationId", request.organization_id.as_deref()),
            organization_level: lenient(
                "organizationLevel",
                request.organization_level.as_deref(),
                OrganizationLevel::parse,
            )
            .map(|l| l.as_str().to_string()),
            parent_institution_id,
            status: status.as_str().to_string(),
            city: non_blank(request.location.city),
            state: non_blank(request.location.state),
            country: non_blank(request.location.country),
            campuses: Value::Array(request.location.campuses),
            branding,
            about: json_object(request.about),
            community: json_object(request.community),
            facts_and_figures: json_object(request.facts_and_figures),
            rankings: json_array(request.rankings),
            accreditations: json_array(request.accreditations),
            admission_info: json_object(request.admission_info),
            is_verified: request.tags.is_verified.unwrap_or(false),
            is_active: request.is_active.unwrap_or(true),
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        let university = self.universities.insert(university).await?;
        record_university_mutation("create");
        info!(university_id = %university.id, name = %university.name, "University created");

        self.detail(&university).await
    }

    /// Partial update; only supplied, valid fields are written
    pub async fn update(
        &self,
        id: &str,
        request: UpdateUniversityRequest,
    ) -> Result<UniversityDetail> {
        request.validate()?;
        let id = parse_id(id).ok_or_else(|| AppError::not_found("University", id))?;

        let name = match request.name {
            Some(name) => Some(
                non_blank(Some(name))
                    .ok_or_else(|| AppError::validation("name", "Name must not be blank"))?,
            ),
            None => None,
        };

        let parent_institution_id =
            match reference_update("parentInstitutionId", request.parent_institution_id) {
                Some(Some(candidate)) => self
                    .existing_parent(Some(candidate), id)
                    .await?
                    .map(Some),
                other => other,
            };

        let branding = match &request.branding {
            Some(branding) => Some(branding.to_value()?),
            None => None,
        };

        let location = request.location.unwrap_or_default();
        let patch = UniversityPatch {
            name,
            short_name: text_update(request.short_name),
            tagline: text_update(request.tagline),
            institution_type: lenient(
                "institutionType",
                request.institution_type.as_deref(),
                InstitutionType::parse,
            ),
            organization_id: reference_update("organizationId", request.organization_id),
            organization_level: lenient(
                "organizationLevel",
                request.organization_level.as_deref(),
                OrganizationLevel::parse,
            ),
            parent_institution_id,
            status: lenient("status", request.status.as_deref(), UniversityStatus::parse),
            city: text_update(location.city),
            state: text_update(location.state),
            country: text_update(location.country),
            campuses: location.campuses.map(Value::Array),
            branding,
            about: request.about,
            community: request.community,
            facts_and_figures: request.facts_and_figures,
            rankings: request.rankings.map(Value::Array),
            accreditations: request.accreditations.map(Value::Array),
            admission_info: request.admission_info,
            is_verified: request.tags.and_then(|t| t.is_verified),
            is_active: request.is_active,
        };

        let university = self
            .universities
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("University", id.to_string()))?;

        record_university_mutation("update");
        info!(university_id = %id, "University updated");

        self.detail(&university).await
    }

    /// Refused with Conflict while any course references the university
    pub async fn delete(&self, id: &str) -> Result<()> {
        let university = self.find(id).await?;

        let referencing = self.courses.count_by_university(university.id).await?;
        if referencing > 0 {
            record_delete_conflict();
            warn!(
                university_id = %university.id,
                courses = referencing,
                "University delete blocked by referencing courses"
            );
            return Err(AppError::Conflict {
                message: format!(
                    "University {} is referenced by {} course(s); reassign or remove them first",
                    university.id, referencing
                ),
            });
        }

        if !self.universities.delete(university.id).await? {
            return Err(AppError::not_found("University", university.id.to_string()));
        }

        // Not atomic with the delete above
        let detached = self.courses.detach_university(university.id).await?;
        if detached > 0 {
            warn!(
                university_id = %university.id,
                detached,
                "Cleared course references created during delete"
            );
        }

        record_university_mutation("delete");
        info!(university_id = %university.id, "University deleted");
        Ok(())
    }

    pub async fn stats(&self) -> Result<UniversityStats> {
        let total = self.universities.count(None).await?;
        let active = self.universities.count(Some(true)).await?;
        let inactive = self.universities.count(Some(false)).await?;

        let by_type = self
            .universities
            .count_by(UniversityGroupKey::InstitutionType)
            .await?;
        let by_country = self.universities.count_by(UniversityGroupKey::Country).await?;

        Ok(UniversityStats {
            total,
            active,
            inactive,
            by_institution_type: rank_groups(by_type, None),
            top_countries: rank_groups(by_country, Some(TOP_COUNTRIES)),
        })
    }

    /// Courses referencing the university, ordered by name
    pub async fn courses_of(&self, id: &str) -> Result<Vec<CourseSummary>> {
        let university = self.find(id).await?;
        let courses = self.courses.list_by_university(university.id).await?;

        debug!(university_id = %university.id, count = courses.len(), "Listed university courses");
        Ok(courses.iter().map(CourseSummary::from).collect())
    }

    async fn find(&self, id: &str) -> Result<University> {
        let parsed = parse_id(id).ok_or_else(|| AppError::not_found("University", id))?;

        self.universities
            .find_by_id(parsed)
            .await?
            .ok_or_else(|| AppError::not_found("University", id))
    }

    /// Attach the parent summary when the reference still resolves
    async fn detail(&self, university: &University) -> Result<UniversityDetail> {
        let parent = match university.parent_institution_id {
            Some(parent_id) => {
                let parent = self.universities.find_by_id(parent_id).await?;
                if parent.is_none() {
                    debug!(university_id = %university.id, %parent_id, "Parent institution missing");
                }
                parent
            }
            None => None,
        };

        Ok(UniversityDetail::new(university, parent.as_ref()))
    }

    /// A parent must exist and differ from the institution itself
    async fn existing_parent(&self, candidate: Option<Uuid>, own_id: Uuid) -> Result<Option<Uuid>> {
        let Some(parent_id) = candidate else {
            return Ok(None);
        };

        if parent_id == own_id {
            dropped("parentInstitutionId", &parent_id.to_string());
            return Ok(None);
        }

        match self.universities.find_by_id(parent_id).await? {
            Some(_) => Ok(Some(parent_id)),
            None => {
                dropped("parentInstitutionId", &parent_id.to_string());
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_invalid_filters() {
        let params = UniversityListParams {
            search: Some("  Aalto ".into()),
            institution_type: Some("Polytechnic".into()),
            organization_id: Some("not-an-id".into()),
            status: Some("bogus".into()),
            is_active: Some("maybe".into()),
            page: Some(0),
            page_size: Some(1000),
            ..Default::default()
        };

        let (query, page) = params.normalize();
        assert_eq!(query.search.as_deref(), Some("aalto"));
        assert_eq!(query.institution_type, None);
        assert_eq!(query.organization_id, None);
        assert_eq!(query.status, None);
        assert_eq!(query.is_active, None);
        assert_eq!(page, PageRequest { page: 1, page_size: 100 });
    }

    #[test]
    fn test_normalize_parent_filter() {
        for raw in ["", "null"] {
            let params = UniversityListParams {
                parent_institution_id: Some(raw.into()),
                ..Default::default()
            };
            assert_eq!(params.normalize().0.parent, Some(ParentFilter::Root));
        }

        let id = Uuid::new_v4();
        let params = UniversityListParams {
            parent_institution_id: Some(id.to_string()),
            ..Default::default()
        };
        assert_eq!(params.normalize().0.parent, Some(ParentFilter::Is(id)));

        let params = UniversityListParams {
            parent_institution_id: Some("garbage".into()),
            ..Default::default()
        };
        assert_eq!(params.normalize().0.parent, None);
    }

    #[test]
    fn test_rank_groups() {
        let groups = rank_groups(
            vec![
                (Some("Finland".into()), 2),
                (None, 1),
                (Some("".into()), 2),
                (Some("Estonia".into()), 2),
                (Some("India".into()), 5),
            ],
            Some(3),
        );

        assert_eq!(
            groups,
            vec![
                GroupCount { key: "India".into(), count: 5 },
                GroupCount { key: "Unknown".into(), count: 3 },
                GroupCount { key: "Estonia".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_update_body_distinguishes_null_from_absent() {
        let body: UpdateUniversityRequest =
            serde_json::from_str(r#"{"parentInstitutionId": null, "location": {"city": null}}"#).unwrap();
        assert_eq!(body.parent_institution_id, Some(None));
        assert_eq!(body.organization_id, None);
        let location = body.location.unwrap();
        assert_eq!(location.city, Some(None));
        assert_eq!(location.country, None);
    }

    #[test]
    fn test_branding_urls_validated() {
        let request = CreateUniversityRequest {
            name: "Aalto".into(),
            branding: Some(BrandingInput {
                logo_url: Some("not a url".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}

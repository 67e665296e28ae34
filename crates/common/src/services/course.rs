//! Course service

use crate::db::models::*;
use crate::db::patch::CoursePatch;
use crate::db::query::{CourseQuery, PageRequest, Paginated};
use crate::db::{CourseRepository, Repositories, UniversityRepository};
use crate::errors::{AppError, Result};
use crate::metrics::record_course_mutation;
use crate::services::input::{
    deserialize_some, lenient, non_blank, parse_flag, parse_id, reference, reference_update,
    text_update,
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListParams {
    pub search: Option<String>,
    pub university_id: Option<String>,
    pub organization_id: Option<String>,
    pub is_active: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl CourseListParams {
    pub fn normalize(&self) -> (CourseQuery, PageRequest) {
        let query = CourseQuery {
            search: non_blank(self.search.clone()).map(|s| s.to_lowercase()),
            university_id: lenient("universityId", self.university_id.as_deref(), parse_id),
            organization_id: lenient("organizationId", self.organization_id.as_deref(), parse_id),
            is_active: lenient("isActive", self.is_active.as_deref(), parse_flag),
        };

        (query, PageRequest::clamped(self.page, self.page_size))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 300))]
    pub name: String,

    #[validate(length(max = 50))]
    pub short_name: Option<String>,

    #[validate(length(max = 50))]
    pub course_code: Option<String>,

    pub category_id: Option<String>,
    pub level_id: Option<String>,
    pub type_id: Option<String>,
    pub organization_id: Option<String>,
    pub university_id: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 300))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub short_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub course_code: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub level_id: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub type_id: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub organization_id: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub university_id: Option<Option<String>>,

    pub keywords: Option<Vec<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub start_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub end_date: Option<Option<NaiveDate>>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub course_code: Option<String>,
    pub category_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub type_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub university_id: Option<Uuid>,
    pub keywords: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<&Course> for CourseSummary {
    fn from(c: &Course) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            short_name: c.short_name.clone(),
            course_code: c.course_code.clone(),
            category_id: c.category_id,
            level_id: c.level_id,
            type_id: c.type_id,
            organization_id: c.organization_id,
            university_id: c.university_id,
            keywords: c.keyword_list(),
            start_date: c.start_date,
            end_date: c.end_date,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityRef {
    pub id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub summary: CourseSummary,
    pub created_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<UniversityRef>,
}

/// Trimmed, non-blank, de-duplicated keywords in input order
fn clean_keywords(raw: Vec<String>) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::with_capacity(raw.len());
    for keyword in raw {
        let keyword = keyword.trim();
        if !keyword.is_empty() && !keywords.iter().any(|k| k == keyword) {
            keywords.push(keyword.to_string());
        }
    }
    keywords
}

fn check_date_order(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AppError::validation(
            "endDate",
            format!("End date {} is before start date {}", end, start),
        )),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    universities: Arc<dyn UniversityRepository>,
}

impl CourseService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            courses: repos.courses.clone(),
            universities: repos.universities.clone(),
        }
    }

    pub async fn list(&self, params: &CourseListParams) -> Result<Paginated<CourseSummary>> {
        let (query, page) = params.normalize();
        debug!(?query, page = page.page, page_size = page.page_size, "Listing courses");

        let (courses, total) = self.courses.list(&query, page).await?;

        Ok(Paginated {
            items: courses.iter().map(CourseSummary::from).collect(),
            pagination: page.meta(total),
        })
    }

    pub async fn get_by_id(&self, id: &str) -> Result<CourseDetail> {
        let course = self.find(id).await?;
        self.detail(&course).await
    }

    pub async fn create(
        &self,
        request: CreateCourseRequest,
        actor: Option<Uuid>,
    ) -> Result<CourseDetail> {
        request.validate()?;
        let name = non_blank(Some(request.name))
            .ok_or_else(|| AppError::validation("name", "Name must not be blank"))?;
        check_date_order(request.start_date, request.end_date)?;

        let university_id = reference("universityId", request.university_id.as_deref());
        if let Some(university_id) = university_id {
            self.require_university(university_id).await?;
        }

        let now = Utc::now().into();
        let course = Course {
            id: Uuid::new_v4(),
            name,
            short_name: non_blank(request.short_name),
            course_code: non_blank(request.course_code),
            category_id: reference("categoryId", request.category_id.as_deref()),
            level_id: reference("levelId", request.level_id.as_deref()),
            type_id: reference("typeId", request.type_id.as_deref()),
            organization_id: reference("organizationId", request.organization_id.as_deref()),
            university_id,
            keywords: Value::from(clean_keywords(request.keywords)),
            start_date: request.start_date,
            end_date: request.end_date,
            is_active: request.is_active.unwrap_or(true),
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        let course = self.courses.insert(course).await?;
        record_course_mutation("create");
        info!(course_id = %course.id, university_id = ?course.university_id, "Course created");

        self.detail(&course).await
    }

    pub async fn update(&self, id: &str, request: UpdateCourseRequest) -> Result<CourseDetail> {
        request.validate()?;
        let existing = self.find(id).await?;

        let name = match request.name {
            Some(name) => Some(
                non_blank(Some(name))
                    .ok_or_else(|| AppError::validation("name", "Name must not be blank"))?,
            ),
            None => None,
        };

        let start_date = request.start_date.unwrap_or(existing.start_date);
        let end_date = request.end_date.unwrap_or(existing.end_date);
        check_date_order(start_date, end_date)?;

        let university_id = reference_update("universityId", request.university_id);
        if let Some(Some(university_id)) = university_id {
            self.require_university(university_id).await?;
        }

        let patch = CoursePatch {
            name,
            short_name: text_update(request.short_name),
            course_code: text_update(request.course_code),
            category_id: reference_update("categoryId", request.category_id),
            level_id: reference_update("levelId", request.level_id),
            type_id: reference_update("typeId", request.type_id),
            organization_id: reference_update("organizationId", request.organization_id),
            university_id,
            keywords: request.keywords.map(clean_keywords),
            start_date: request.start_date,
            end_date: request.end_date,
            is_active: request.is_active,
        };

        let course = self
            .courses
            .update(existing.id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Course", existing.id.to_string()))?;

        record_course_mutation("update");
        info!(course_id = %course.id, "Course updated");

        self.detail(&course).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let course = self.find(id).await?;

        if !self.courses.delete(course.id).await? {
            return Err(AppError::not_found("Course", course.id.to_string()));
        }

        record_course_mutation("delete");
        info!(course_id = %course.id, "Course deleted");
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Course> {
        let parsed = parse_id(id).ok_or_else(|| AppError::not_found("Course", id))?;

        self.courses
            .find_by_id(parsed)
            .await?
            .ok_or_else(|| AppError::not_found("Course", id))
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

    async fn detail(&self, course: &Course) -> Result<CourseDetail> {
        let university = match course.university_id {
            Some(university_id) => self.universities.find_by_id(university_id).await?,
            None => None,
        };

        Ok(CourseDetail {
            summary: CourseSummary::from(course),
            created_by: course.created_by,
            university: university.map(|u| UniversityRef {
                id: u.id,
                name: u.name,
                short_name: u.short_name,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_keywords() {
        let keywords = clean_keywords(vec![
            " rust ".into(),
            "".into(),
            "systems".into(),
            "rust".into(),
        ]);
        assert_eq!(keywords, vec!["rust", "systems"]);
    }

    #[test]
    fn test_date_order() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 1);
        let end = NaiveDate::from_ymd_opt(2025, 6, 1);
        assert!(check_date_order(start, end).is_err());
        assert!(check_date_order(end, start).is_ok());
        assert!(check_date_order(start, None).is_ok());
    }

    #[test]
    fn test_normalize_course_filters() {
        let university = Uuid::new_v4();
        let params = CourseListParams {
            search: Some(" CS101 ".into()),
            university_id: Some(university.to_string()),
            organization_id: Some("nope".into()),
            is_active: Some("0".into()),
            ..Default::default()
        };
        let (query, page) = params.normalize();
        assert_eq!(query.search.as_deref(), Some("cs101"));
        assert_eq!(query.university_id, Some(university));
        assert_eq!(query.organization_id, None);
        assert_eq!(query.is_active, Some(false));
        assert_eq!(page, PageRequest::default());
    }
}

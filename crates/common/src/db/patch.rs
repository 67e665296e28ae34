//! Partial updates
//!
//! `None` leaves a column untouched. For nullable columns the inner
//! option distinguishes "clear" (`Some(None)`) from "set" (`Some(Some(v))`).

use crate::db::models::*;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue::NotSet, Set};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniversityPatch {
    pub name: Option<String>,
    pub short_name: Option<Option<String>>,
    pub tagline: Option<Option<String>>,
    pub institution_type: Option<InstitutionType>,
    pub organization_id: Option<Option<Uuid>>,
    pub organization_level: Option<OrganizationLevel>,
    pub parent_institution_id: Option<Option<Uuid>>,
    pub status: Option<UniversityStatus>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub campuses: Option<Value>,
    pub branding: Option<Value>,
    pub about: Option<Value>,
    pub community: Option<Value>,
    pub facts_and_figures: Option<Value>,
    pub rankings: Option<Value>,
    pub accreditations: Option<Value>,
    pub admission_info: Option<Value>,
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
}

impl UniversityPatch {
    /// Apply in place (memory store)
    pub fn apply(self, university: &mut University, now: DateTime<Utc>) {
        if let Some(v) = self.name {
            university.name = v;
        }
        if let Some(v) = self.short_name {
            university.short_name = v;
        }
        if let Some(v) = self.tagline {
            university.tagline = v;
        }
        if let Some(v) = self.institution_type {
            university.institution_type = Some(v.as_str().to_string());
        }
        if let Some(v) = self.organization_id {
            university.organization_id = v;
        }
        if let Some(v) = self.organization_level {
            university.organization_level = Some(v.as_str().to_string());
        }
        if let Some(v) = self.parent_institution_id {
            university.parent_institution_id = v;
        }
        if let Some(v) = self.status {
            university.status = v.as_str().to_string();
        }
        if let Some(v) = self.city {
            university.city = v;
        }
        if let Some(v) = self.state {
            university.state = v;
        }
        if let Some(v) = self.country {
            university.country = v;
        }
        if let Some(v) = self.campuses {
            university.campuses = v;
        }
        if let Some(v) = self.branding {
            university.branding = v;
        }
        if let Some(v) = self.about {
            university.about = v;
        }
        if let Some(v) = self.community {
            university.community = v;
        }
        if let Some(v) = self.facts_and_figures {
            university.facts_and_figures = v;
        }
        if let Some(v) = self.rankings {
            university.rankings = v;
        }
        if let Some(v) = self.accreditations {
            university.accreditations = v;
        }
        if let Some(v) = self.admission_info {
            university.admission_info = v;
        }
        if let Some(v) = self.is_verified {
            university.is_verified = v;
        }
        if let Some(v) = self.is_active {
            university.is_active = v;
        }
        university.updated_at = now.into();
    }

    /// Build an active model touching only the supplied columns (PostgreSQL store)
    pub fn into_active_model(self, id: Uuid, now: DateTime<Utc>) -> UniversityActiveModel {
        UniversityActiveModel {
            id: Set(id),
            name: self.name.map(Set).unwrap_or(NotSet),
            short_name: self.short_name.map(Set).unwrap_or(NotSet),
            tagline: self.tagline.map(Set).unwrap_or(NotSet),
            institution_type: self
                .institution_type
                .map(|v| Set(Some(v.as_str().to_string())))
                .unwrap_or(NotSet),
            organization_id: self.organization_id.map(Set).unwrap_or(NotSet),
            organization_level: self
                .organization_level
                .map(|v| Set(Some(v.as_str().to_string())))
                .unwrap_or(NotSet),
            parent_institution_id: self.parent_institution_id.map(Set).unwrap_or(NotSet),
            status: self
                .status
                .map(|v| Set(v.as_str().to_string()))
                .unwrap_or(NotSet),
            city: self.city.map(Set).unwrap_or(NotSet),
            state: self.state.map(Set).unwrap_or(NotSet),
            country: self.country.map(Set).unwrap_or(NotSet),
            campuses: self.campuses.map(Set).unwrap_or(NotSet),
            branding: self.branding.map(Set).unwrap_or(NotSet),
            about: self.about.map(Set).unwrap_or(NotSet),
            community: self.community.map(Set).unwrap_or(NotSet),
            facts_and_figures: self.facts_and_figures.map(Set).unwrap_or(NotSet),
            rankings: self.rankings.map(Set).unwrap_or(NotSet),
            accreditations: self.accreditations.map(Set).unwrap_or(NotSet),
            admission_info: self.admission_info.map(Set).unwrap_or(NotSet),
            is_verified: self.is_verified.map(Set).unwrap_or(NotSet),
            is_active: self.is_active.map(Set).unwrap_or(NotSet),
            created_by: NotSet,
            created_at: NotSet,
            updated_at: Set(now.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub short_name: Option<Option<String>>,
    pub course_code: Option<Option<String>>,
    pub category_id: Option<Option<Uuid>>,
    pub level_id: Option<Option<Uuid>>,
    pub type_id: Option<Option<Uuid>>,
    pub organization_id: Option<Option<Uuid>>,
    pub university_id: Option<Option<Uuid>>,
    pub keywords: Option<Vec<String>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub is_active: Option<bool>,
}

impl CoursePatch {
    pub fn apply(self, course: &mut Course, now: DateTime<Utc>) {
        if let Some(v) = self.name {
            course.name = v;
        }
        if let Some(v) = self.short_name {
            course.short_name = v;
        }
        if let Some(v) = self.course_code {
            course.course_code = v;
        }
        if let Some(v) = self.category_id {
            course.category_id = v;
        }
        if let Some(v) = self.level_id {
            course.level_id = v;
        }
        if let Some(v) = self.type_id {
            course.type_id = v;
        }
        if let Some(v) = self.organization_id {
            course.organization_id = v;
        }
        if let Some(v) = self.university_id {
            course.university_id = v;
        }
        if let Some(v) = self.keywords {
            course.keywords = Value::from(v);
        }
        if let Some(v) = self.start_date {
            course.start_date = v;
        }
        if let Some(v) = self.end_date {
            course.end_date = v;
        }
        if let Some(v) = self.is_active {
            course.is_active = v;
        }
        course.updated_at = now.into();
    }

    pub fn into_active_model(self, id: Uuid, now: DateTime<Utc>) -> CourseActiveModel {
        CourseActiveModel {
            id: Set(id),
            name: self.name.map(Set).unwrap_or(NotSet),
            short_name: self.short_name.map(Set).unwrap_or(NotSet),
            course_code: self.course_code.map(Set).unwrap_or(NotSet),
            category_id: self.category_id.map(Set).unwrap_or(NotSet),
            level_id: self.level_id.map(Set).unwrap_or(NotSet),
            type_id: self.type_id.map(Set).unwrap_or(NotSet),
            organization_id: self.organization_id.map(Set).unwrap_or(NotSet),
            university_id: self.university_id.map(Set).unwrap_or(NotSet),
            keywords: self.keywords.map(|v| Set(Value::from(v))).unwrap_or(NotSet),
            start_date: self.start_date.map(Set).unwrap_or(NotSet),
            end_date: self.end_date.map(Set).unwrap_or(NotSet),
            is_active: self.is_active.map(Set).unwrap_or(NotSet),
            created_by: NotSet,
            created_at: NotSet,
            updated_at: Set(now.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_clears_and_keeps() {
        let now = Utc::now();
        let mut course = Course {
            id: Uuid::new_v4(),
            name: "Compilers".into(),
            short_name: Some("CC".into()),
            course_code: Some("CS-301".into()),
            category_id: None,
            level_id: None,
            type_id: None,
            organization_id: None,
            university_id: Some(Uuid::new_v4()),
            keywords: Value::from(vec!["parsing"]),
            start_date: None,
            end_date: None,
            is_active: true,
            created_by: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let patch = CoursePatch {
            short_name: Some(None),
            university_id: Some(None),
            ..Default::default()
        };
        patch.apply(&mut course, now);

        assert_eq!(course.name, "Compilers");
        assert_eq!(course.short_name, None);
        assert_eq!(course.course_code.as_deref(), Some("CS-301"));
        assert_eq!(course.university_id, None);
        assert_eq!(course.keywords, serde_json::json!(["parsing"]));
    }

    #[test]
    fn test_active_model_only_sets_supplied_columns() {
        let id = Uuid::new_v4();
        let patch = UniversityPatch {
            name: Some("Renamed".into()),
            parent_institution_id: Some(None),
            ..Default::default()
        };
        let active = patch.into_active_model(id, Utc::now());

        assert_eq!(active.name, Set("Renamed".to_string()));
        assert_eq!(active.parent_institution_id, Set(None));
        assert!(active.status.is_not_set());
        assert!(active.organization_id.is_not_set());
        assert!(active.created_at.is_not_set());
    }
}

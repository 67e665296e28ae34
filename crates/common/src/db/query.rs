//! Normalised query objects shared by both stores
//!
//! Services validate caller input once and hand these to a repository.
//! The PostgreSQL store turns them into a sea-orm `Condition`, the memory
//! store evaluates `matches` against each document.

use crate::db::models::*;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// A clamped page request (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Clamp raw values: page >= 1, 1 <= page_size <= 100, page_size defaults to 20
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1) as u64;
        let page_size = page_size
            .map(|size| size.clamp(1, MAX_PAGE_SIZE as i64) as u64)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, page_size }
    }

    /// Rows to skip, or `None` when the page lies beyond any addressable row
    pub fn offset(&self) -> Option<u64> {
        (self.page - 1)
            .checked_mul(self.page_size)
            .filter(|offset| *offset <= i64::MAX as u64)
    }

    /// Offset to read from when the page can hold rows out of `total_items`
    pub fn offset_within(&self, total_items: u64) -> Option<u64> {
        self.offset().filter(|offset| *offset < total_items)
    }

    pub fn meta(&self, total_items: u64) -> PageMeta {
        PageMeta {
            page: self.page,
            page_size: self.page_size,
            total_items,
            total_pages: total_items.div_ceil(self.page_size).max(1),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}

/// Pagination metadata returned with every list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageMeta,
}

/// Parent filter: a specific parent, or "has no parent"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentFilter {
    Root,
    Is(Uuid),
}

/// Conjunctive university filter; `None` fields are not applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniversityQuery {
    /// Lower-cased free text, matched as a substring
    pub search: Option<String>,
    pub country: Option<String>,
    pub institution_type: Option<InstitutionType>,
    pub organization_id: Option<Uuid>,
    pub parent: Option<ParentFilter>,
    pub is_active: Option<bool>,
    pub status: Option<UniversityStatus>,
}

impl UniversityQuery {
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(term) = &self.search {
            let pattern = like_pattern(term);
            cond = cond.add(
                Condition::any()
                    .add(lower_like(UniversityColumn::Name, &pattern))
                    .add(lower_like(UniversityColumn::ShortName, &pattern))
                    .add(lower_like(UniversityColumn::Tagline, &pattern))
                    .add(lower_like(UniversityColumn::City, &pattern))
                    .add(lower_like(UniversityColumn::State, &pattern))
                    .add(lower_like(UniversityColumn::Country, &pattern)),
            );
        }
        if let Some(country) = &self.country {
            cond = cond.add(UniversityColumn::Country.eq(country.clone()));
        }
        if let Some(kind) = self.institution_type {
            cond = cond.add(UniversityColumn::InstitutionType.eq(kind.as_str()));
        }
        if let Some(org) = self.organization_id {
            cond = cond.add(UniversityColumn::OrganizationId.eq(org));
        }
        match self.parent {
            Some(ParentFilter::Root) => {
                cond = cond.add(UniversityColumn::ParentInstitutionId.is_null());
            }
            Some(ParentFilter::Is(parent)) => {
                cond = cond.add(UniversityColumn::ParentInstitutionId.eq(parent));
            }
            None => {}
        }
        if let Some(active) = self.is_active {
            cond = cond.add(UniversityColumn::IsActive.eq(active));
        }
        if let Some(status) = self.status {
            cond = cond.add(UniversityColumn::Status.eq(status.as_str()));
        }

        cond
    }

    pub fn matches(&self, university: &University) -> bool {
        if let Some(term) = &self.search {
            let hit = [
                Some(university.name.as_str()),
                university.short_name.as_deref(),
                university.tagline.as_deref(),
                university.city.as_deref(),
                university.state.as_deref(),
                university.country.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(term.as_str()));
            if !hit {
                return false;
            }
        }
        if let Some(country) = &self.country {
            if university.country.as_deref() != Some(country.as_str()) {
                return false;
            }
        }
        if let Some(kind) = self.institution_type {
            if university.institution_type.as_deref() != Some(kind.as_str()) {
                return false;
            }
        }
        if let Some(org) = self.organization_id {
            if university.organization_id != Some(org) {
                return false;
            }
        }
        match self.parent {
            Some(ParentFilter::Root) if university.parent_institution_id.is_some() => return false,
            Some(ParentFilter::Is(parent)) if university.parent_institution_id != Some(parent) => {
                return false
            }
            _ => {}
        }
        if let Some(active) = self.is_active {
            if university.is_active != active {
                return false;
            }
        }
        if let Some(status) = self.status {
            if university.status != status.as_str() {
                return false;
            }
        }
        true
    }
}

/// Conjunctive course filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseQuery {
    pub search: Option<String>,
    pub university_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

impl CourseQuery {
    pub fn for_university(university_id: Uuid) -> Self {
        Self {
            university_id: Some(university_id),
            ..Self::default()
        }
    }

    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(term) = &self.search {
            let pattern = like_pattern(term);
            cond = cond.add(
                Condition::any()
                    .add(lower_like(CourseColumn::Name, &pattern))
                    .add(lower_like(CourseColumn::ShortName, &pattern))
                    .add(lower_like(CourseColumn::CourseCode, &pattern)),
            );
        }
        if let Some(university) = self.university_id {
            cond = cond.add(CourseColumn::UniversityId.eq(university));
        }
        if let Some(org) = self.organization_id {
            cond = cond.add(CourseColumn::OrganizationId.eq(org));
        }
        if let Some(active) = self.is_active {
            cond = cond.add(CourseColumn::IsActive.eq(active));
        }

        cond
    }

    pub fn matches(&self, course: &Course) -> bool {
        if let Some(term) = &self.search {
            let hit = [
                Some(course.name.as_str()),
                course.short_name.as_deref(),
                course.course_code.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(term.as_str()));
            if !hit {
                return false;
            }
        }
        if self.university_id.is_some() && course.university_id != self.university_id {
            return false;
        }
        if self.organization_id.is_some() && course.organization_id != self.organization_id {
            return false;
        }
        if let Some(active) = self.is_active {
            if course.is_active != active {
                return false;
            }
        }
        true
    }
}

/// Grouping key for university stats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniversityGroupKey {
    InstitutionType,
    Country,
}

impl UniversityGroupKey {
    pub fn column(&self) -> UniversityColumn {
        match self {
            UniversityGroupKey::InstitutionType => UniversityColumn::InstitutionType,
            UniversityGroupKey::Country => UniversityColumn::Country,
        }
    }

    pub fn value<'a>(&self, university: &'a University) -> Option<&'a str> {
        match self {
            UniversityGroupKey::InstitutionType => university.institution_type.as_deref(),
            UniversityGroupKey::Country => university.country.as_deref(),
        }
    }
}

/// Escape LIKE wildcards so the term matches literally
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", escape_like(&term.to_lowercase()))
}

fn lower_like<C: ColumnTrait>(column: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn university(name: &str) -> University {
        let now = Utc::now().into();
        University {
            id: Uuid::new_v4(),
            name: name.to_string(),
            short_name: None,
            tagline: None,
            institution_type: Some("University".to_string()),
            organization_id: None,
            organization_level: None,
            parent_institution_id: None,
            status: "Active".to_string(),
            city: Some("Helsinki".to_string()),
            state: None,
            country: Some("Finland".to_string()),
            campuses: serde_json::json!([]),
            branding: serde_json::json!({}),
            about: serde_json::json!({}),
            community: serde_json::json!({}),
            facts_and_figures: serde_json::json!({}),
            rankings: serde_json::json!([]),
            accreditations: serde_json::json!([]),
            admission_info: serde_json::json!({}),
            is_verified: false,
            is_active: true,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(PageRequest::clamped(None, None), PageRequest { page: 1, page_size: 20 });
        assert_eq!(PageRequest::clamped(Some(0), Some(0)), PageRequest { page: 1, page_size: 1 });
        assert_eq!(PageRequest::clamped(Some(-4), Some(500)), PageRequest { page: 1, page_size: 100 });
        assert_eq!(PageRequest::clamped(Some(3), Some(10)).offset(), Some(20));
    }

    #[test]
    fn test_huge_page_has_no_offset() {
        let page = PageRequest::clamped(Some(i64::MAX), Some(100));
        assert_eq!(page.page, i64::MAX as u64);
        assert_eq!(page.offset(), None);
        assert_eq!(page.offset_within(5), None);

        let meta = page.meta(5);
        assert_eq!(meta.total_items, 5);
        assert_eq!(meta.total_pages, 1);
    }

    #[test]
    fn test_offset_within_total() {
        let page = PageRequest::clamped(Some(2), Some(10));
        assert_eq!(page.offset_within(11), Some(10));
        assert_eq!(page.offset_within(10), None);
    }

    #[test]
    fn test_total_pages_never_zero() {
        let page = PageRequest::clamped(Some(1), Some(10));
        assert_eq!(page.meta(0).total_pages, 1);
        assert_eq!(page.meta(10).total_pages, 1);
        assert_eq!(page.meta(11).total_pages, 2);
    }

    #[test]
    fn test_search_matches_any_text_field() {
        let mut uni = university("Aalto University");
        uni.tagline = Some("Where science meets art".to_string());

        let query = UniversityQuery {
            search: Some("science".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&uni));

        let query = UniversityQuery {
            search: Some("helsinki".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&uni));

        let query = UniversityQuery {
            search: Some("oxford".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&uni));
    }

    #[test]
    fn test_parent_filter() {
        let mut child = university("Branch Campus");
        let root = university("Main Campus");
        child.parent_institution_id = Some(root.id);

        let roots = UniversityQuery {
            parent: Some(ParentFilter::Root),
            ..Default::default()
        };
        assert!(roots.matches(&root));
        assert!(!roots.matches(&child));

        let children = UniversityQuery {
            parent: Some(ParentFilter::Is(root.id)),
            ..Default::default()
        };
        assert!(children.matches(&child));
        assert!(!children.matches(&root));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(UniversityQuery::default().matches(&university("Anything")));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_sure\\"), "100\\%\\_sure\\\\");
        assert_eq!(like_pattern("MIT"), "%mit%");
    }
}

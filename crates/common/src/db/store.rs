//! Repository traits
//!
//! Each collection gets a narrow async interface so services can run
//! against PostgreSQL in production and the memory store in tests.

use crate::db::models::*;
use crate::db::patch::{CoursePatch, UniversityPatch};
use crate::db::query::{CourseQuery, PageRequest, UniversityGroupKey, UniversityQuery};
use crate::errors::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait UniversityRepository: Send + Sync {
    /// Filtered page ordered by `created_at` desc then `name` asc, plus the total match count
    async fn list(
        &self,
        query: &UniversityQuery,
        page: PageRequest,
    ) -> Result<(Vec<University>, u64)>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<University>>;

    async fn insert(&self, university: University) -> Result<University>;

    /// Returns `None` when no document has this id
    async fn update(&self, id: Uuid, patch: UniversityPatch) -> Result<Option<University>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Count, optionally restricted to one `is_active` value
    async fn count(&self, is_active: Option<bool>) -> Result<u64>;

    /// Raw group counts; absent keys are reported as `None`
    async fn count_by(&self, key: UniversityGroupKey) -> Result<Vec<(Option<String>, u64)>>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn list(&self, query: &CourseQuery, page: PageRequest) -> Result<(Vec<Course>, u64)>;

    /// Every course referencing the university, ordered by name
    async fn list_by_university(&self, university_id: Uuid) -> Result<Vec<Course>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>>;

    async fn insert(&self, course: Course) -> Result<Course>;

    async fn update(&self, id: Uuid, patch: CoursePatch) -> Result<Option<Course>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn count_by_university(&self, university_id: Uuid) -> Result<u64>;

    /// Null out `university_id` on every referencing course; returns rows touched
    async fn detach_university(&self, university_id: Uuid) -> Result<u64>;
}

#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn list_forms(
        &self,
        status: Option<FormStatus>,
        page: PageRequest,
    ) -> Result<(Vec<ApplicationForm>, u64)>;

    async fn find_form(&self, id: Uuid) -> Result<Option<ApplicationForm>>;

    async fn insert_form(&self, form: ApplicationForm) -> Result<ApplicationForm>;

    /// Full replace of an existing form
    async fn save_form(&self, form: ApplicationForm) -> Result<ApplicationForm>;

    /// Deletes the form and its fields
    async fn delete_form(&self, id: Uuid) -> Result<bool>;

    /// Fields of a form ordered by position
    async fn list_fields(&self, form_id: Uuid) -> Result<Vec<FormField>>;

    async fn find_field(&self, id: Uuid) -> Result<Option<FormField>>;

    async fn insert_field(&self, field: FormField) -> Result<FormField>;

    async fn save_field(&self, field: FormField) -> Result<FormField>;

    async fn delete_field(&self, id: Uuid) -> Result<bool>;

    /// All categories ordered by position then name
    async fn list_categories(&self) -> Result<Vec<FormCategory>>;

    async fn find_category(&self, id: Uuid) -> Result<Option<FormCategory>>;

    async fn insert_category(&self, category: FormCategory) -> Result<FormCategory>;

    async fn delete_category(&self, id: Uuid) -> Result<bool>;

    /// Fields referencing the category as category or subcategory
    async fn count_fields_in_category(&self, category_id: Uuid) -> Result<u64>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<()>;
}

/// The repositories a process runs with
#[derive(Clone)]
pub struct Repositories {
    pub universities: Arc<dyn UniversityRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub forms: Arc<dyn FormRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    /// Wire every trait to one store value
    pub fn from_store<S>(store: S) -> Self
    where
        S: UniversityRepository + CourseRepository + FormRepository + HealthCheck + Clone + 'static,
    {
        Self {
            universities: Arc::new(store.clone()),
            courses: Arc::new(store.clone()),
            forms: Arc::new(store.clone()),
            health: Arc::new(store),
        }
    }
}

//! In-memory document store for local development and tests

use crate::db::models::*;
use crate::db::patch::{CoursePatch, UniversityPatch};
use crate::db::query::{CourseQuery, PageRequest, UniversityGroupKey, UniversityQuery};
use crate::db::store::{CourseRepository, FormRepository, HealthCheck, UniversityRepository};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    universities: HashMap<Uuid, University>,
    courses: HashMap<Uuid, Course>,
    forms: HashMap<Uuid, ApplicationForm>,
    fields: HashMap<Uuid, FormField>,
    categories: HashMap<Uuid, FormCategory>,
}

/// Cloning shares the underlying collections
#[derive(Clone, Default)]
pub struct MemoryRepository {
    data: Arc<RwLock<Collections>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_of<T: Clone>(items: Vec<T>, page: PageRequest) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let Some(offset) = page.offset_within(total) else {
        return (Vec::new(), total);
    };

    let slice = items
        .into_iter()
        .skip(offset as usize)
        .take(page.page_size as usize)
        .collect();
    (slice, total)
}

fn duplicate(resource_type: &str, id: Uuid) -> AppError {
    AppError::Conflict {
        message: format!("{} {} already exists", resource_type, id),
    }
}

#[async_trait]
impl HealthCheck for MemoryRepository {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl UniversityRepository for MemoryRepository {
    async fn list(
        &self,
        query: &UniversityQuery,
        page: PageRequest,
    ) -> Result<(Vec<University>, u64)> {
        let data = self.data.read().await;
        let mut matched: Vec<University> = data
            .universities
            .values()
            .filter(|u| query.matches(u))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(page_of(matched, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<University>> {
        Ok(self.data.read().await.universities.get(&id).cloned())
    }

    async fn insert(&self, university: University) -> Result<University> {
        let mut data = self.data.write().await;
        if data.universities.contains_key(&university.id) {
            return Err(duplicate("University", university.id));
        }
        data.universities.insert(university.id, university.clone());
        Ok(university)
    }

    async fn update(&self, id: Uuid, patch: UniversityPatch) -> Result<Option<University>> {
        let mut data = self.data.write().await;
        Ok(data.universities.get_mut(&id).map(|university| {
            patch.apply(university, chrono::Utc::now());
            university.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.data.write().await.universities.remove(&id).is_some())
    }

    async fn count(&self, is_active: Option<bool>) -> Result<u64> {
        let data = self.data.read().await;
        Ok(data
            .universities
            .values()
            .filter(|u| is_active.map_or(true, |active| u.is_active == active))
            .count() as u64)
    }

    async fn count_by(&self, key: UniversityGroupKey) -> Result<Vec<(Option<String>, u64)>> {
        let data = self.data.read().await;
        let mut groups: HashMap<Option<String>, u64> = HashMap::new();
        for university in data.universities.values() {
            *groups.entry(key.value(university).map(String::from)).or_default() += 1;
        }
        Ok(groups.into_iter().collect())
    }
}

#[async_trait]
impl CourseRepository for MemoryRepository {
    async fn list(&self, query: &CourseQuery, page: PageRequest) -> Result<(Vec<Course>, u64)> {
        let data = self.data.read().await;
        let mut matched: Vec<Course> = data
            .courses
            .values()
            .filter(|c| query.matches(c))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(page_of(matched, page))
    }

    async fn list_by_university(&self, university_id: Uuid) -> Result<Vec<Course>> {
        let data = self.data.read().await;
        let mut courses: Vec<Course> = data
            .courses
            .values()
            .filter(|c| c.university_id == Some(university_id))
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(courses)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>> {
        Ok(self.data.read().await.courses.get(&id).cloned())
    }

    async fn insert(&self, course: Course) -> Result<Course> {
        let mut data = self.data.write().await;
        if data.courses.contains_key(&course.id) {
            return Err(duplicate("Course", course.id));
        }
        data.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn update(&self, id: Uuid, patch: CoursePatch) -> Result<Option<Course>> {
        let mut data = self.data.write().await;
        Ok(data.courses.get_mut(&id).map(|course| {
            patch.apply(course, chrono::Utc::now());
            course.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.data.write().await.courses.remove(&id).is_some())
    }

    async fn count_by_university(&self, university_id: Uuid) -> Result<u64> {
        let data = self.data.read().await;
        Ok(data
            .courses
            .values()
            .filter(|c| c.university_id == Some(university_id))
            .count() as u64)
    }

    async fn detach_university(&self, university_id: Uuid) -> Result<u64> {
        let mut data = self.data.write().await;
        let now = chrono::Utc::now();
        let mut touched = 0;
        for course in data.courses.values_mut() {
            if course.university_id == Some(university_id) {
                course.university_id = None;
                course.updated_at = now.into();
                touched += 1;
            }
        }
        Ok(touched)
    }
}

#[async_trait]
impl FormRepository for MemoryRepository {
    async fn list_forms(
        &self,
        status: Option<FormStatus>,
        page: PageRequest,
    ) -> Result<(Vec<ApplicationForm>, u64)> {
        let data = self.data.read().await;
        let mut matched: Vec<ApplicationForm> = data
            .forms
            .values()
            .filter(|f| status.map_or(true, |s| f.status == s.as_str()))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.title.cmp(&b.title))
        });

        Ok(page_of(matched, page))
    }

    async fn find_form(&self, id: Uuid) -> Result<Option<ApplicationForm>> {
        Ok(self.data.read().await.forms.get(&id).cloned())
    }

    async fn insert_form(&self, form: ApplicationForm) -> Result<ApplicationForm> {
        let mut data = self.data.write().await;
        if data.forms.contains_key(&form.id) {
            return Err(duplicate("ApplicationForm", form.id));
        }
        data.forms.insert(form.id, form.clone());
        Ok(form)
    }

    async fn save_form(&self, form: ApplicationForm) -> Result<ApplicationForm> {
        let mut data = self.data.write().await;
        match data.forms.get_mut(&form.id) {
            Some(existing) => {
                *existing = form.clone();
                Ok(form)
            }
            None => Err(AppError::not_found("ApplicationForm", form.id.to_string())),
        }
    }

    async fn delete_form(&self, id: Uuid) -> Result<bool> {
        let mut data = self.data.write().await;
        data.fields.retain(|_, field| field.form_id != id);
        Ok(data.forms.remove(&id).is_some())
    }

    async fn list_fields(&self, form_id: Uuid) -> Result<Vec<FormField>> {
        let data = self.data.read().await;
        let mut fields: Vec<FormField> = data
            .fields
            .values()
            .filter(|f| f.form_id == form_id)
            .cloned()
            .collect();
        fields.sort_by_key(|f| f.position);
        Ok(fields)
    }

    async fn find_field(&self, id: Uuid) -> Result<Option<FormField>> {
        Ok(self.data.read().await.fields.get(&id).cloned())
    }

    async fn insert_field(&self, field: FormField) -> Result<FormField> {
        let mut data = self.data.write().await;
        if data.fields.contains_key(&field.id) {
            return Err(duplicate("FormField", field.id));
        }
        data.fields.insert(field.id, field.clone());
        Ok(field)
    }

    async fn save_field(&self, field: FormField) -> Result<FormField> {
        let mut data = self.data.write().await;
        match data.fields.get_mut(&field.id) {
            Some(existing) => {
                *existing = field.clone();
                Ok(field)
            }
            None => Err(AppError::not_found("FormField", field.id.to_string())),
        }
    }

    async fn delete_field(&self, id: Uuid) -> Result<bool> {
        Ok(self.data.write().await.fields.remove(&id).is_some())
    }

    async fn list_categories(&self) -> Result<Vec<FormCategory>> {
        let data = self.data.read().await;
        let mut categories: Vec<FormCategory> = data.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<FormCategory>> {
        Ok(self.data.read().await.categories.get(&id).cloned())
    }

    async fn insert_category(&self, category: FormCategory) -> Result<FormCategory> {
        let mut data = self.data.write().await;
        if data.categories.contains_key(&category.id) {
            return Err(duplicate("FormCategory", category.id));
        }
        data.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        Ok(self.data.write().await.categories.remove(&id).is_some())
    }

    async fn count_fields_in_category(&self, category_id: Uuid) -> Result<u64> {
        let data = self.data.read().await;
        Ok(data
            .fields
            .values()
            .filter(|f| f.category_id == category_id || f.subcategory_id == Some(category_id))
            .count() as u64)
    }
}

//! PostgreSQL repository
//!
//! sea-orm implementation of the repository traits with proper error
//! handling. No multi-document transactions are used.
//!
//! Lists count first and only query rows when the requested page can hold
//! any, so out-of-range pages never reach the database as an OFFSET.

use crate::db::models::*;
use crate::db::patch::{CoursePatch, UniversityPatch};
use crate::db::query::{CourseQuery, PageRequest, UniversityGroupKey, UniversityQuery};
use crate::db::store::{CourseRepository, FormRepository, HealthCheck, UniversityRepository};
use crate::db::DbPool;
use crate::errors::Result;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the connection
    fn conn(&self) -> &DatabaseConnection {
        self.pool.connection()
    }
}

// ========================================================================
// Health Check
// ========================================================================

#[async_trait]
impl HealthCheck for Repository {
    async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }
}

// ========================================================================
// University Operations
// ========================================================================

#[async_trait]
impl UniversityRepository for Repository {
    async fn list(
        &self,
        query: &UniversityQuery,
        page: PageRequest,
    ) -> Result<(Vec<University>, u64)> {
        let select = UniversityEntity::find().filter(query.condition());

        let total = select.clone().count(self.conn()).await?;
        let Some(offset) = page.offset_within(total) else {
            return Ok((Vec::new(), total));
        };

        let universities = select
            .order_by_desc(UniversityColumn::CreatedAt)
            .order_by_asc(UniversityColumn::Name)
            .offset(offset)
            .limit(page.page_size)
            .all(self.conn())
            .await?;

        Ok((universities, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<University>> {
        UniversityEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn insert(&self, university: University) -> Result<University> {
        let active: UniversityActiveModel = university.into();
        UniversityEntity::insert(active.reset_all())
            .exec_with_returning(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn update(&self, id: Uuid, patch: UniversityPatch) -> Result<Option<University>> {
        if UniversityEntity::find_by_id(id).one(self.conn()).await?.is_none() {
            return Ok(None);
        }

        let updated = patch
            .into_active_model(id, chrono::Utc::now())
            .update(self.conn())
            .await?;

        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = UniversityEntity::delete_by_id(id).exec(self.conn()).await?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self, is_active: Option<bool>) -> Result<u64> {
        let mut select = UniversityEntity::find();
        if let Some(active) = is_active {
            select = select.filter(UniversityColumn::IsActive.eq(active));
        }

        select.count(self.conn()).await.map_err(Into::into)
    }

    async fn count_by(&self, key: UniversityGroupKey) -> Result<Vec<(Option<String>, u64)>> {
        let column = key.column();

        let rows: Vec<(Option<String>, i64)> = UniversityEntity::find()
            .select_only()
            .column(column)
            .column_as(Expr::col(UniversityColumn::Id).count(), "count")
            .group_by(column)
            .into_tuple()
            .all(self.conn())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(value, count)| (value, count.max(0) as u64))
            .collect())
    }
}

// ========================================================================
// Course Operations
// ========================================================================

#[async_trait]
impl CourseRepository for Repository {
    async fn list(&self, query: &CourseQuery, page: PageRequest) -> Result<(Vec<Course>, u64)> {
        let select = CourseEntity::find().filter(query.condition());

        let total = select.clone().count(self.conn()).await?;
        let Some(offset) = page.offset_within(total) else {
            return Ok((Vec::new(), total));
        };

        let courses = select
            .order_by_desc(CourseColumn::CreatedAt)
            .order_by_asc(CourseColumn::Name)
            .offset(offset)
            .limit(page.page_size)
            .all(self.conn())
            .await?;

        Ok((courses, total))
    }

    async fn list_by_university(&self, university_id: Uuid) -> Result<Vec<Course>> {
        CourseEntity::find()
            .filter(CourseColumn::UniversityId.eq(university_id))
            .order_by_asc(CourseColumn::Name)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>> {
        CourseEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn insert(&self, course: Course) -> Result<Course> {
        let active: CourseActiveModel = course.into();
        CourseEntity::insert(active.reset_all())
            .exec_with_returning(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn update(&self, id: Uuid, patch: CoursePatch) -> Result<Option<Course>> {
        if CourseEntity::find_by_id(id).one(self.conn()).await?.is_none() {
            return Ok(None);
        }

        let updated = patch
            .into_active_model(id, chrono::Utc::now())
            .update(self.conn())
            .await?;

        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = CourseEntity::delete_by_id(id).exec(self.conn()).await?;

        Ok(result.rows_affected > 0)
    }

    async fn count_by_university(&self, university_id: Uuid) -> Result<u64> {
        CourseEntity::find()
            .filter(CourseColumn::UniversityId.eq(university_id))
            .count(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn detach_university(&self, university_id: Uuid) -> Result<u64> {
        let result = CourseEntity::update_many()
            .col_expr(CourseColumn::UniversityId, Expr::value(Option::<Uuid>::None))
            .col_expr(
                CourseColumn::UpdatedAt,
                Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(chrono::Utc::now())),
            )
            .filter(CourseColumn::UniversityId.eq(university_id))
            .exec(self.conn())
            .await?;

        Ok(result.rows_affected)
    }
}

// ========================================================================
// Application Form Operations
// ========================================================================

#[async_trait]
impl FormRepository for Repository {
    async fn list_forms(
        &self,
        status: Option<FormStatus>,
        page: PageRequest,
    ) -> Result<(Vec<ApplicationForm>, u64)> {
        let mut select = ApplicationFormEntity::find();
        if let Some(status) = status {
            select = select.filter(ApplicationFormColumn::Status.eq(status.as_str()));
        }

        let total = select.clone().count(self.conn()).await?;
        let Some(offset) = page.offset_within(total) else {
            return Ok((Vec::new(), total));
        };

        let forms = select
            .order_by_desc(ApplicationFormColumn::CreatedAt)
            .order_by_asc(ApplicationFormColumn::Title)
            .offset(offset)
            .limit(page.page_size)
            .all(self.conn())
            .await?;

        Ok((forms, total))
    }

    async fn find_form(&self, id: Uuid) -> Result<Option<ApplicationForm>> {
        ApplicationFormEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn insert_form(&self, form: ApplicationForm) -> Result<ApplicationForm> {
        let active: ApplicationFormActiveModel = form.into();
        ApplicationFormEntity::insert(active.reset_all())
            .exec_with_returning(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn save_form(&self, form: ApplicationForm) -> Result<ApplicationForm> {
        let active: ApplicationFormActiveModel = form.into();
        active.reset_all().update(self.conn()).await.map_err(Into::into)
    }

    async fn delete_form(&self, id: Uuid) -> Result<bool> {
        FormFieldEntity::delete_many()
            .filter(FormFieldColumn::FormId.eq(id))
            .exec(self.conn())
            .await?;

        let result = ApplicationFormEntity::delete_by_id(id).exec(self.conn()).await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_fields(&self, form_id: Uuid) -> Result<Vec<FormField>> {
        FormFieldEntity::find()
            .filter(FormFieldColumn::FormId.eq(form_id))
            .order_by_asc(FormFieldColumn::Position)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn find_field(&self, id: Uuid) -> Result<Option<FormField>> {
        FormFieldEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn insert_field(&self, field: FormField) -> Result<FormField> {
        let active: FormFieldActiveModel = field.into();
        FormFieldEntity::insert(active.reset_all())
            .exec_with_returning(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn save_field(&self, field: FormField) -> Result<FormField> {
        let active: FormFieldActiveModel = field.into();
        active.reset_all().update(self.conn()).await.map_err(Into::into)
    }

    async fn delete_field(&self, id: Uuid) -> Result<bool> {
        let result = FormFieldEntity::delete_by_id(id).exec(self.conn()).await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_categories(&self) -> Result<Vec<FormCategory>> {
        FormCategoryEntity::find()
            .order_by_asc(FormCategoryColumn::Position)
            .order_by_asc(FormCategoryColumn::Name)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<FormCategory>> {
        FormCategoryEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn insert_category(&self, category: FormCategory) -> Result<FormCategory> {
        let active = FormCategoryActiveModel {
            id: Set(category.id),
            name: Set(category.name),
            parent_id: Set(category.parent_id),
            position: Set(category.position),
            is_active: Set(category.is_active),
            created_at: Set(category.created_at),
        };

        active.insert(self.conn()).await.map_err(Into::into)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        let result = FormCategoryEntity::delete_by_id(id).exec(self.conn()).await?;

        Ok(result.rows_affected > 0)
    }

    async fn count_fields_in_category(&self, category_id: Uuid) -> Result<u64> {
        FormFieldEntity::find()
            .filter(
                Condition::any()
                    .add(FormFieldColumn::CategoryId.eq(category_id))
                    .add(FormFieldColumn::SubcategoryId.eq(category_id)),
            )
            .count(self.conn())
            .await
            .map_err(Into::into)
    }
}

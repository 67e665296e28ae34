//! Course entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub short_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub course_code: Option<String>,

    pub category_id: Option<Uuid>,

    pub level_id: Option<Uuid>,

    pub type_id: Option<Uuid>,

    pub organization_id: Option<Uuid>,

    /// Nulled, never cascaded, when the university is deleted
    pub university_id: Option<Uuid>,

    /// Array of keyword strings
    #[sea_orm(column_type = "JsonBinary")]
    pub keywords: Json,

    pub start_date: Option<Date>,

    pub end_date: Option<Date>,

    pub is_active: bool,

    pub created_by: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|k| k.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::university::Entity",
        from = "Column::UniversityId",
        to = "super::university::Column::Id",
        on_delete = "SetNull"
    )]
    University,
}

impl Related<super::university::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::University.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Application form entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Form lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Draft,
    Published,
    Archived,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Draft => "draft",
            FormStatus::Published => "published",
            FormStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "draft" => Some(FormStatus::Draft),
            "published" => Some(FormStatus::Published),
            "archived" => Some(FormStatus::Archived),
            _ => None,
        }
    }

    /// draft -> published -> archived, or straight from draft to archived
    pub fn can_transition_to(&self, next: FormStatus) -> bool {
        matches!(
            (self, next),
            (FormStatus::Draft, FormStatus::Published)
                | (FormStatus::Draft, FormStatus::Archived)
                | (FormStatus::Published, FormStatus::Archived)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "application_forms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub university_id: Option<Uuid>,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    pub is_active: bool,

    pub published_at: Option<DateTimeWithTimeZone>,

    pub archived_at: Option<DateTimeWithTimeZone>,

    pub created_by: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the form status as an enum
    pub fn form_status(&self) -> FormStatus {
        FormStatus::parse(&self.status).unwrap_or(FormStatus::Draft)
    }

    pub fn is_archived(&self) -> bool {
        self.form_status() == FormStatus::Archived
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::form_field::Entity")]
    Fields,
}

impl Related<super::form_field::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fields.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        assert!(FormStatus::Draft.can_transition_to(FormStatus::Published));
        assert!(FormStatus::Draft.can_transition_to(FormStatus::Archived));
        assert!(FormStatus::Published.can_transition_to(FormStatus::Archived));

        assert!(!FormStatus::Published.can_transition_to(FormStatus::Draft));
        assert!(!FormStatus::Archived.can_transition_to(FormStatus::Published));
        assert!(!FormStatus::Archived.can_transition_to(FormStatus::Archived));
        assert!(!FormStatus::Published.can_transition_to(FormStatus::Published));
    }
}

//! University entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of institution
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstitutionType {
    University,
    #[serde(rename = "COE")]
    Coe,
    Industry,
    School,
}

impl InstitutionType {
    pub const ALL: [InstitutionType; 4] = [
        InstitutionType::University,
        InstitutionType::Coe,
        InstitutionType::Industry,
        InstitutionType::School,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstitutionType::University => "University",
            InstitutionType::Coe => "COE",
            InstitutionType::Industry => "Industry",
            InstitutionType::School => "School",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value.trim())
    }
}

/// Position of an institution inside its organization
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationLevel {
    Parent,
    Child,
    Branch,
}

impl OrganizationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationLevel::Parent => "parent",
            OrganizationLevel::Child => "child",
            OrganizationLevel::Branch => "branch",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "parent" => Some(OrganizationLevel::Parent),
            "child" => Some(OrganizationLevel::Child),
            "branch" => Some(OrganizationLevel::Branch),
            _ => None,
        }
    }
}

/// Administrative status, independent of `is_active`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniversityStatus {
    #[default]
    Active,
    Suspended,
}

impl UniversityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniversityStatus::Active => "Active",
            UniversityStatus::Suspended => "Suspended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Active" => Some(UniversityStatus::Active),
            "Suspended" => Some(UniversityStatus::Suspended),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "universities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub short_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub tagline: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub institution_type: Option<String>,

    pub organization_id: Option<Uuid>,

    #[sea_orm(column_type = "Text", nullable)]
    pub organization_level: Option<String>,

    pub parent_institution_id: Option<Uuid>,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub city: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub state: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub country: Option<String>,

    /// Array of campus documents
    #[sea_orm(column_type = "JsonBinary")]
    pub campuses: Json,

    /// Logo, banner and colour URLs
    #[sea_orm(column_type = "JsonBinary")]
    pub branding: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub about: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub community: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub facts_and_figures: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub rankings: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub accreditations: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub admission_info: Json,

    pub is_verified: bool,

    pub is_active: bool,

    pub created_by: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course::Entity")]
    Courses,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Form field entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Input widget of a field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Email,
    Phone,
    Date,
    Select,
    Multiselect,
    Radio,
    Checkbox,
    File,
}

impl FieldType {
    pub const ALL: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Date,
        FieldType::Select,
        FieldType::Multiselect,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::File => "file",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Choice widgets carry an options list
    pub fn requires_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect | FieldType::Radio)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "form_fields")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub form_id: Uuid,

    pub category_id: Uuid,

    pub subcategory_id: Option<Uuid>,

    #[sea_orm(column_type = "Text")]
    pub label: String,

    /// Unique within the form
    #[sea_orm(column_type = "Text")]
    pub key: String,

    #[sea_orm(column_type = "Text")]
    pub field_type: String,

    pub required: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub placeholder: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub help_text: Option<String>,

    /// Array of option strings
    #[sea_orm(column_type = "JsonBinary")]
    pub options: Json,

    pub position: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn kind(&self) -> FieldType {
        FieldType::parse(&self.field_type).unwrap_or(FieldType::Text)
    }

    pub fn option_list(&self) -> Vec<String> {
        self.options
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|o| o.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::application_form::Entity",
        from = "Column::FormId",
        to = "super::application_form::Column::Id",
        on_delete = "Cascade"
    )]
    Form,

    #[sea_orm(
        belongs_to = "super::form_category::Entity",
        from = "Column::CategoryId",
        to = "super::form_category::Column::Id"
    )]
    Category,
}

impl Related<super::application_form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl Related<super::form_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! SeaORM entity models
//!
//! One collection per entity: universities, courses, application forms,
//! form categories and form fields.

mod university;
mod course;
mod application_form;
mod form_category;
mod form_field;

pub use university::{
    Entity as UniversityEntity,
    Model as University,
    ActiveModel as UniversityActiveModel,
    Column as UniversityColumn,
    InstitutionType,
    OrganizationLevel,
    UniversityStatus,
};

pub use course::{
    Entity as CourseEntity,
    Model as Course,
    ActiveModel as CourseActiveModel,
    Column as CourseColumn,
};

pub use application_form::{
    Entity as ApplicationFormEntity,
    Model as ApplicationForm,
    ActiveModel as ApplicationFormActiveModel,
    Column as ApplicationFormColumn,
    FormStatus,
};

pub use form_category::{
    Entity as FormCategoryEntity,
    Model as FormCategory,
    ActiveModel as FormCategoryActiveModel,
    Column as FormCategoryColumn,
};

pub use form_field::{
    Entity as FormFieldEntity,
    Model as FormField,
    ActiveModel as FormFieldActiveModel,
    Column as FormFieldColumn,
    FieldType,
};

//! Domain services
//!
//! Provides:
//! - University and course management over the repository traits
//! - Application forms, fields and categories with their lifecycle
//! - Event and scholarship publish checklists
//! - Lenient input normalisation shared by all of the above

mod course;
mod forms;
pub mod input;
pub mod publishing;
mod university;

pub use course::{
    CourseDetail, CourseListParams, CourseService, CourseSummary, CreateCourseRequest,
    UniversityRef, UpdateCourseRequest,
};
pub use forms::{
    field_key, field_options, AddFieldRequest, CategoryNode, CategoryView, CreateCategoryRequest,
    CreateFormRequest, FieldView, FormDetail, FormListParams, FormService, FormView,
    ReorderFieldsRequest, UpdateFieldRequest, UpdateFormRequest,
};
pub use publishing::{
    check_event, check_scholarship, normalize_stages, ChecklistItem, EventDraft, PublishChecklist,
    ScholarshipDraft, Stage, StageDraft,
};
pub use university::{
    BrandingInput, CreateUniversityRequest, GroupCount, Location, LocationInput, LocationUpdate,
    ParentSummary, Tags, TagsInput, UniversityDetail, UniversityListParams, UniversityService,
    UniversityStats, UniversitySummary, UpdateUniversityRequest, TOP_COUNTRIES, UNKNOWN_GROUP,
};

use crate::db::Repositories;

/// Every service a process runs with, wired to one set of repositories
#[derive(Clone)]
pub struct Services {
    pub universities: UniversityService,
    pub courses: CourseService,
    pub forms: FormService,
}

impl Services {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            universities: UniversityService::new(repos),
            courses: CourseService::new(repos),
            forms: FormService::new(repos),
        }
    }
}

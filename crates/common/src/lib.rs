//! Acado Common Library
//!
//! Shared code for the Acado admissions API including:
//! - Document models and repository patterns
//! - Domain services for universities, courses and application forms
//! - Error types and handling
//! - Configuration management
//! - Actor extraction
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{MemoryRepository, Repositories, Repository};
pub use errors::{AppError, Result};
pub use services::Services;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

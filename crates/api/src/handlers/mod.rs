//! API handlers module

pub mod courses;
pub mod forms;
pub mod health;
pub mod publish;
pub mod universities;

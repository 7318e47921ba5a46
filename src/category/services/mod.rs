//! Application services for category management.

mod catalog;

pub use catalog::{CategoryService, CategoryServiceError, CategoryServiceResult};

//! Domain model for user-owned task categories.

mod category;
mod error;
mod ids;

pub use category::{Category, CategoryWithTaskCount, PersistedCategoryData};
pub use error::CategoryDomainError;
pub use ids::{CategoryId, CategoryName};

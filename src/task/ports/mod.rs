//! Port contracts for task management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod publisher;
pub mod repository;

pub use publisher::{PublishError, TaskEventPublisher};
pub use repository::{TaskEdit, TaskRepository, TaskRepositoryError, TaskRepositoryResult};

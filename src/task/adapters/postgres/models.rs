//! Diesel row models for task persistence.

use crate::schema::{category_task, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Title text.
    pub title: String,
    /// Description text.
    pub description: String,
    /// Status token.
    pub status: String,
    /// Priority token.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Title text.
    pub title: String,
    /// Description text.
    pub description: String,
    /// Status token.
    pub status: String,
    /// Priority token.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Full-row changeset written after an edit.
///
/// Absent optional values are written as `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangesetRow {
    /// Title text.
    pub title: String,
    /// Description text.
    pub description: String,
    /// Status token.
    pub status: String,
    /// Priority token.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task/category associations.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = category_task)]
pub struct CategoryTaskRow {
    /// Associated task.
    pub task_id: Uuid,
    /// Associated category.
    pub category_id: Uuid,
}

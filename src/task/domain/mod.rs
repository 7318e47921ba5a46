//! Domain model for task management.
//!
//! Tasks belong to exactly one user, carry a closed status and priority, and
//! keep `completed_at` consistent with their status. Listing filters and
//! ordering are expressed as plain values so that every repository adapter
//! interprets them identically.

mod error;
mod event;
mod filter;
mod ids;
mod status;
mod task;

pub use error::{
    ParseSortError, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError,
    TaskFilterError,
};
pub use event::TaskEvent;
pub use filter::{
    CompletionFilter, RawTaskFilters, SortDirection, TaskFilters, TaskQuery, TaskSort,
    TaskSortField,
};
pub use ids::{TaskId, TaskTitle};
pub use status::{TaskPriority, TaskStatus};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskChanges};

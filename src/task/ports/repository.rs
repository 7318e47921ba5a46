//! Repository port for task persistence, listing and category association.

use crate::category::domain::CategoryId;
use crate::pagination::{Page, PageRequest};
use crate::task::domain::{Task, TaskId, TaskQuery};
use crate::user::UserId;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Derives the replacement state of a task from its currently stored state.
///
/// Repositories invoke the edit while holding the row, so decisions taken
/// inside it cannot be invalidated by a concurrent writer.
pub type TaskEdit = Box<dyn FnOnce(Task) -> Task + Send>;

/// Task persistence contract.
///
/// Repositories translate queries and enforce storage integrity only; they
/// apply no ownership rules beyond what a query explicitly asks for.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns one page of tasks matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::InvalidPage`] when the resolved page
    /// number or page size is zero.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Page<Task>>;

    /// Fetches a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no task has the id.
    async fn get(&self, id: TaskId) -> TaskRepositoryResult<Task>;

    /// Returns `true` when the task exists and is owned by `owner`.
    async fn belongs_to_owner(&self, id: TaskId, owner: UserId) -> TaskRepositoryResult<bool>;

    /// Stores a new task together with its category associations.
    ///
    /// When `categories` is non-empty every entry must name a distinct
    /// category owned by the task's owner; otherwise nothing is written.
    /// Repeating an id fails the check.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the id already
    /// exists or [`TaskRepositoryError::CategoryOwnershipMismatch`] when a
    /// category is missing or owned by another user.
    async fn create(&self, task: &Task, categories: &[CategoryId]) -> TaskRepositoryResult<()>;

    /// Rewrites a stored task and optionally replaces its category set.
    ///
    /// `edit` receives the task as currently stored. When `categories` is
    /// `Some`, the association set becomes exactly that set (an empty list
    /// clears it) after checking ownership against the edited task's owner
    /// with the same rule as [`TaskRepository::create`].
    /// Both steps are atomic with respect to other writers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist or [`TaskRepositoryError::CategoryOwnershipMismatch`] when a
    /// category is missing or owned by another user, in which case nothing
    /// is written.
    async fn update(
        &self,
        id: TaskId,
        edit: TaskEdit,
        categories: Option<Vec<CategoryId>>,
    ) -> TaskRepositoryResult<Task>;

    /// Deletes a task together with its category associations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Returns the identifiers of the categories associated with a task,
    /// sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn category_ids(&self, id: TaskId) -> TaskRepositoryResult<Vec<CategoryId>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Some requested categories are not owned by the task owner.
    #[error("{} categories are not owned by user {owner}", .rejected.len())]
    CategoryOwnershipMismatch {
        /// Owner the categories were checked against.
        owner: UserId,
        /// Requested categories that are missing, owned by someone else or
        /// repeated in the request.
        rejected: Vec<CategoryId>,
    },

    /// The requested page window is empty.
    #[error("invalid page window: page {} of size {}", .0.page(), .0.per_page())]
    InvalidPage(PageRequest),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Checks a requested category list against the categories `owner` owns.
///
/// The request passes only when the number of distinct owned categories it
/// names equals its length, so repeated ids fail like foreign ones.
pub(crate) fn check_category_ownership(
    owner: UserId,
    requested: &[CategoryId],
    owned: &BTreeSet<CategoryId>,
) -> TaskRepositoryResult<()> {
    let distinct: BTreeSet<CategoryId> = requested.iter().copied().collect();
    let owned_count = distinct.iter().filter(|id| owned.contains(*id)).count();
    if owned_count == requested.len() {
        return Ok(());
    }

    let mut seen = BTreeSet::new();
    let rejected: BTreeSet<CategoryId> = requested
        .iter()
        .filter(|id| !owned.contains(*id) || !seen.insert(**id))
        .copied()
        .collect();
    Err(TaskRepositoryError::CategoryOwnershipMismatch {
        owner,
        rejected: rejected.into_iter().collect(),
    })
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

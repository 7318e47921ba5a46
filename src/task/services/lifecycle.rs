//! Service layer for task listing, creation, update and deletion.

use crate::category::domain::CategoryId;
use crate::pagination::Page;
use crate::task::{
    domain::{
        NewTaskData, Task, TaskChanges, TaskDomainError, TaskEvent, TaskFilters, TaskId,
        TaskPriority, TaskQuery, TaskSort, TaskStatus, TaskTitle,
    },
    ports::{TaskEdit, TaskEventPublisher, TaskRepository, TaskRepositoryError},
};
use crate::user::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    due_date: Option<NaiveDate>,
    owner: Option<UserId>,
    categories: Vec<CategoryId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
            owner: None,
            categories: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the initial priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Files the task under another user instead of the acting one.
    #[must_use]
    pub const fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Sets the categories the task is filed under.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = CategoryId>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }
}

/// Request payload for updating a task.
///
/// Only the fields that were set are written. Nullable columns distinguish
/// "leave untouched" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    due_date: Option<Option<NaiveDate>>,
    completed_at: Option<Option<DateTime<Utc>>>,
    categories: Option<Vec<CategoryId>>,
}

impl UpdateTaskRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Replaces or clears the completion timestamp.
    #[must_use]
    pub const fn with_completed_at(mut self, completed_at: Option<DateTime<Utc>>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }

    /// Replaces the category set; an empty collection clears it.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = CategoryId>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// Returns the requested status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the requested completion timestamp change, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<Option<DateTime<Utc>>> {
        self.completed_at
    }

    /// Returns the requested category set, if any.
    #[must_use]
    pub fn categories(&self) -> Option<&[CategoryId]> {
        self.categories.as_deref()
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// The task does not exist or is not visible to the requesting owner.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Some requested categories are missing, owned by another user or repeated.
    #[error("{} categories are not owned by user {owner}", .rejected.len())]
    InvalidCategoryOwnership {
        /// Owner the categories were checked against.
        owner: UserId,
        /// Rejected category identifiers.
        rejected: Vec<CategoryId>,
    },

    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::TaskNotFound(id),
            TaskRepositoryError::CategoryOwnershipMismatch { owner, rejected } => {
                Self::InvalidCategoryOwnership { owner, rejected }
            }
            other => Self::Repository(other),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Converts a repository failure, logging caller-visible rejections.
fn into_service_error(err: TaskRepositoryError) -> TaskServiceError {
    let service_error = TaskServiceError::from(err);
    match &service_error {
        TaskServiceError::TaskNotFound(id) => warn!(task_id = %id, "task not found"),
        TaskServiceError::InvalidCategoryOwnership { owner, rejected } => warn!(
            owner = %owner,
            rejected = rejected.len(),
            "rejected categories not owned by task owner"
        ),
        TaskServiceError::Validation(_) | TaskServiceError::Repository(_) => {}
    }
    service_error
}

/// Task orchestration service.
///
/// Every operation that accepts an `owner` treats a task owned by someone
/// else exactly like a missing task.
#[derive(Clone)]
pub struct TaskService<R, P, C>
where
    R: TaskRepository,
    P: TaskEventPublisher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    publisher: Arc<P>,
    clock: Arc<C>,
}

impl<R, P, C> TaskService<R, P, C>
where
    R: TaskRepository,
    P: TaskEventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            publisher,
            clock,
        }
    }

    /// Lists one page of tasks, optionally restricted to an owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the page window is
    /// invalid or the lookup fails.
    pub async fn list_tasks(
        &self,
        filters: TaskFilters,
        sort: TaskSort,
        owner: Option<UserId>,
    ) -> TaskServiceResult<Page<Task>> {
        let query = TaskQuery::new(filters, sort, owner);
        let (field, direction) = sort.resolved();
        debug!(
            owner = ?owner,
            sort = field.as_str(),
            direction = ?direction,
            page = query.page_request().page(),
            "listing tasks"
        );
        self.repository.list(&query).await.map_err(into_service_error)
    }

    /// Fetches a task, checking ownership when `owner` is given.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the task is missing or
    /// owned by another user.
    pub async fn get_task(&self, id: TaskId, owner: Option<UserId>) -> TaskServiceResult<Task> {
        let task = self.repository.get(id).await.map_err(into_service_error)?;
        if owner.is_some_and(|expected| task.owner() != expected) {
            warn!(task_id = %id, "task not visible to requesting owner");
            return Err(TaskServiceError::TaskNotFound(id));
        }
        Ok(task)
    }

    /// Creates a task on behalf of `actor` and announces it.
    ///
    /// The task belongs to `actor` unless the request names another owner.
    /// A failure to publish [`TaskEvent::Created`] is logged and does not
    /// affect the stored task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] for an invalid title,
    /// [`TaskServiceError::InvalidCategoryOwnership`] when a category does
    /// not belong to the owner, or [`TaskServiceError::Repository`] when
    /// persistence fails. Nothing is stored on error.
    pub async fn create_task(
        &self,
        actor: UserId,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let CreateTaskRequest {
            title,
            description,
            status,
            priority,
            due_date,
            owner,
            categories,
        } = request;

        let data = NewTaskData {
            owner: owner.unwrap_or(actor),
            title: TaskTitle::new(title)?,
            description: description
                .map(|text| text.trim().to_owned())
                .unwrap_or_default(),
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            due_date,
        };
        let task = Task::new(data, &*self.clock);
        self.repository
            .create(&task, &categories)
            .await
            .map_err(into_service_error)?;

        info!(
            task_id = %task.id(),
            owner = %task.owner(),
            categories = categories.len(),
            "task created"
        );
        self.announce_created(&task).await;
        Ok(task)
    }

    /// Updates a task, keeping `completed_at` consistent with its status.
    ///
    /// The completion decision is taken against the task as stored at write
    /// time. When the request carries categories the task's category set is
    /// replaced, even by an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the task is missing or
    /// owned by another user, [`TaskServiceError::Validation`] for an
    /// invalid title, or [`TaskServiceError::InvalidCategoryOwnership`] when
    /// a category does not belong to the task owner.
    pub async fn update_task(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
        owner: Option<UserId>,
    ) -> TaskServiceResult<Task> {
        self.ensure_visible(id, owner).await?;

        let UpdateTaskRequest {
            title,
            description,
            status,
            priority,
            due_date,
            completed_at,
            categories,
        } = request;
        let changes = TaskChanges {
            title: title.map(TaskTitle::new).transpose()?,
            description: description.map(|text| text.trim().to_owned()),
            status,
            priority,
            due_date,
            completed_at,
        };

        let now = self.clock.utc();
        let edit: TaskEdit = Box::new(move |mut task: Task| {
            let reconciled = changes.reconcile_completion(task.status(), now);
            task.apply(reconciled, now);
            task
        });
        let task = self
            .repository
            .update(id, edit, categories)
            .await
            .map_err(into_service_error)?;

        info!(task_id = %id, status = task.status().as_str(), "task updated");
        Ok(task)
    }

    /// Applies a "completed" checkbox to an update request.
    ///
    /// Checking it stamps `completed_at` with the current time and forces
    /// the status to [`TaskStatus::Completed`]. Unchecking it clears
    /// `completed_at` and leaves the requested status alone.
    #[must_use]
    pub fn apply_completed_flag(
        &self,
        request: UpdateTaskRequest,
        completed: bool,
    ) -> UpdateTaskRequest {
        if completed {
            request
                .with_completed_at(Some(self.clock.utc()))
                .with_status(TaskStatus::Completed)
        } else {
            request.with_completed_at(None)
        }
    }

    /// Deletes a task and its category associations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the task is missing or
    /// owned by another user.
    pub async fn delete_task(&self, id: TaskId, owner: Option<UserId>) -> TaskServiceResult<bool> {
        self.ensure_visible(id, owner).await?;
        let deleted = self.repository.delete(id).await.map_err(into_service_error)?;
        info!(task_id = %id, "task deleted");
        Ok(deleted)
    }

    /// Returns the categories a task is filed under.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the task is missing or
    /// owned by another user.
    pub async fn task_categories(
        &self,
        id: TaskId,
        owner: Option<UserId>,
    ) -> TaskServiceResult<Vec<CategoryId>> {
        self.ensure_visible(id, owner).await?;
        self.repository.category_ids(id).await.map_err(into_service_error)
    }

    async fn ensure_visible(&self, id: TaskId, owner: Option<UserId>) -> TaskServiceResult<()> {
        let Some(expected) = owner else {
            return Ok(());
        };

        let visible = self
            .repository
            .belongs_to_owner(id, expected)
            .await
            .map_err(into_service_error)?;
        if visible {
            Ok(())
        } else {
            warn!(task_id = %id, owner = %expected, "task not visible to requesting owner");
            Err(TaskServiceError::TaskNotFound(id))
        }
    }

    async fn announce_created(&self, task: &Task) {
        let event = TaskEvent::Created { task: task.clone() };
        if let Err(err) = self.publisher.publish(event).await {
            warn!(task_id = %task.id(), error = %err, "failed to publish task created event");
        }
    }
}

//! In-memory task repository over the shared [`InMemoryStore`].

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::category::domain::CategoryId;
use crate::pagination::Page;
use crate::store::{InMemoryStore, StoreState};
use crate::task::{
    domain::{SortDirection, Task, TaskId, TaskQuery, TaskSortField},
    ports::{
        repository::check_category_ownership, TaskEdit, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult,
    },
};
use crate::user::UserId;

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    store: InMemoryStore,
}

impl InMemoryTaskRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn matches_query(state: &StoreState, task: &Task, query: &TaskQuery) -> bool {
    let filters = &query.filters;
    query.owner.is_none_or(|owner| task.owner() == owner)
        && filters.status.is_none_or(|status| task.status() == status)
        && filters
            .priority
            .is_none_or(|priority| task.priority() == priority)
        && filters
            .completion
            .is_none_or(|completion| completion.accepts(task.is_completed()))
        && filters
            .category
            .is_none_or(|category| state.is_associated(task.id(), category))
}

/// Orders present values before absent ones, matching `PostgreSQL`'s
/// default `NULLS LAST` for ascending sorts.
fn nulls_last<T: Ord>(left: Option<T>, right: Option<T>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_by(field: TaskSortField, left: &Task, right: &Task) -> Ordering {
    match field {
        TaskSortField::CreatedAt => left.created_at().cmp(&right.created_at()),
        TaskSortField::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
        TaskSortField::DueDate => nulls_last(left.due_date(), right.due_date()),
        TaskSortField::CompletedAt => nulls_last(left.completed_at(), right.completed_at()),
        TaskSortField::Priority => left.priority().cmp(&right.priority()),
        TaskSortField::Status => left.status().cmp(&right.status()),
        TaskSortField::Title => left.title().as_str().cmp(right.title().as_str()),
    }
}

fn compare_tasks(query: &TaskQuery, left: &Task, right: &Task) -> Ordering {
    let (field, direction) = query.sort.resolved();
    let primary = compare_by(field, left, right);
    let directed = match direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    directed.then_with(|| left.id().cmp(&right.id()))
}

/// Checks that the requested categories are distinct and belong to `owner`.
fn ensure_owned(
    state: &StoreState,
    owner: UserId,
    requested: &[CategoryId],
) -> TaskRepositoryResult<()> {
    let owned = state.owned_categories(owner, requested);
    check_category_ownership(owner, requested, &owned)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Page<Task>> {
        let request = query.page_request();
        if !request.is_valid() {
            return Err(TaskRepositoryError::InvalidPage(request));
        }

        let state = self.store.read().map_err(TaskRepositoryError::persistence)?;
        let mut matching: Vec<&Task> = state
            .tasks
            .values()
            .filter(|task| matches_query(&state, task, query))
            .collect();
        matching.sort_by(|left, right| compare_tasks(query, left, right));

        let total = u64::try_from(matching.len()).map_err(TaskRepositoryError::persistence)?;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let per_page = usize::try_from(request.per_page()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(per_page)
            .cloned()
            .collect();
        Ok(Page::new(items, total, request))
    }

    async fn get(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        let state = self.store.read().map_err(TaskRepositoryError::persistence)?;
        state
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn belongs_to_owner(&self, id: TaskId, owner: UserId) -> TaskRepositoryResult<bool> {
        let state = self.store.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.get(&id).is_some_and(|task| task.owner() == owner))
    }

    async fn create(&self, task: &Task, categories: &[CategoryId]) -> TaskRepositoryResult<()> {
        let mut state = self.store.write().map_err(TaskRepositoryError::persistence)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        ensure_owned(&state, task.owner(), categories)?;
        let requested: BTreeSet<CategoryId> = categories.iter().copied().collect();

        state.tasks.insert(task.id(), task.clone());
        state.sync_categories(task.id(), &requested);
        Ok(())
    }

    async fn update(
        &self,
        id: TaskId,
        edit: TaskEdit,
        categories: Option<Vec<CategoryId>>,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.store.write().map_err(TaskRepositoryError::persistence)?;
        let current = state
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let edited = edit(current);
        if let Some(ref ids) = categories {
            ensure_owned(&state, edited.owner(), ids)?;
        }

        state.tasks.insert(id, edited.clone());
        if let Some(ids) = categories {
            state.sync_categories(id, &ids.into_iter().collect::<BTreeSet<_>>());
        }
        Ok(edited)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.store.write().map_err(TaskRepositoryError::persistence)?;
        state
            .remove_task(id)
            .map(|_| true)
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn category_ids(&self, id: TaskId) -> TaskRepositoryResult<Vec<CategoryId>> {
        let state = self.store.read().map_err(TaskRepositoryError::persistence)?;
        if !state.tasks.contains_key(&id) {
            return Err(TaskRepositoryError::NotFound(id));
        }
        Ok(state.category_ids_of(id))
    }
}

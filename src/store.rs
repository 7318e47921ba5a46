//! Shared in-memory data store backing the in-memory repositories.
//!
//! Tasks, categories and the `category_task` join live in one state guarded
//! by a single lock, so cross-aggregate rules (association ownership, cascade
//! on delete, owner-scoped task counts) hold exactly as they would in a
//! relational store.

use crate::category::adapters::memory::InMemoryCategoryRepository;
use crate::category::domain::{Category, CategoryId};
use crate::task::adapters::memory::InMemoryTaskRepository;
use crate::task::domain::{Task, TaskId};
use crate::user::UserId;
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory relational store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) tasks: HashMap<TaskId, Task>,
    pub(crate) categories: HashMap<CategoryId, Category>,
    pub(crate) category_task: BTreeSet<(TaskId, CategoryId)>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a task repository over this store.
    #[must_use]
    pub fn task_repository(&self) -> InMemoryTaskRepository {
        InMemoryTaskRepository::new(self.clone())
    }

    /// Returns a category repository over this store.
    #[must_use]
    pub fn category_repository(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository::new(self.clone())
    }

    /// Returns the number of rows in the `category_task` join.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lock is poisoned.
    pub fn association_count(&self) -> io::Result<usize> {
        Ok(self.read()?.category_task.len())
    }

    pub(crate) fn read(&self) -> io::Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|err| io::Error::other(err.to_string()))
    }

    pub(crate) fn write(&self) -> io::Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl StoreState {
    /// Returns the requested categories that exist and belong to `owner`.
    pub(crate) fn owned_categories(
        &self,
        owner: UserId,
        requested: &[CategoryId],
    ) -> BTreeSet<CategoryId> {
        requested
            .iter()
            .filter(|id| {
                self.categories
                    .get(*id)
                    .is_some_and(|category| category.owner() == owner)
            })
            .copied()
            .collect()
    }

    /// Replaces the task's associations with exactly `categories`.
    pub(crate) fn sync_categories(&mut self, task_id: TaskId, categories: &BTreeSet<CategoryId>) {
        self.category_task
            .retain(|(task, category)| *task != task_id || categories.contains(category));
        for category in categories {
            self.category_task.insert((task_id, *category));
        }
    }

    /// Returns the task's associated category ids in ascending order.
    pub(crate) fn category_ids_of(&self, task_id: TaskId) -> Vec<CategoryId> {
        self.category_task
            .iter()
            .filter(|(task, _)| *task == task_id)
            .map(|(_, category)| *category)
            .collect()
    }

    /// Returns `true` when the task is filed under the category.
    pub(crate) fn is_associated(&self, task_id: TaskId, category_id: CategoryId) -> bool {
        self.category_task.contains(&(task_id, category_id))
    }

    /// Counts the tasks owned by `owner` that are filed under the category.
    pub(crate) fn owned_task_count(&self, category_id: CategoryId, owner: UserId) -> u64 {
        let count = self
            .category_task
            .iter()
            .filter(|(task_id, category)| {
                *category == category_id
                    && self
                        .tasks
                        .get(task_id)
                        .is_some_and(|task| task.owner() == owner)
            })
            .count();
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    /// Removes a task and its associations, returning the removed task.
    pub(crate) fn remove_task(&mut self, task_id: TaskId) -> Option<Task> {
        let removed = self.tasks.remove(&task_id)?;
        self.category_task.retain(|(task, _)| *task != task_id);
        Some(removed)
    }

    /// Removes a category and its associations, returning the removed
    /// category.
    pub(crate) fn remove_category(&mut self, category_id: CategoryId) -> Option<Category> {
        let removed = self.categories.remove(&category_id)?;
        self.category_task
            .retain(|(_, category)| *category != category_id);
        Some(removed)
    }
}

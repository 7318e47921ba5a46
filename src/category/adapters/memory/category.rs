//! In-memory category repository over the shared [`InMemoryStore`].

use async_trait::async_trait;

use crate::category::{
    domain::{Category, CategoryId, CategoryWithTaskCount},
    ports::{CategoryRepository, CategoryRepositoryError, CategoryRepositoryResult},
};
use crate::pagination::{Page, PageRequest};
use crate::store::{InMemoryStore, StoreState};
use crate::user::UserId;

/// Thread-safe in-memory category repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryRepository {
    store: InMemoryStore,
}

impl InMemoryCategoryRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn owned_by_name(state: &StoreState, owner: UserId) -> Vec<Category> {
    let mut owned: Vec<Category> = state
        .categories
        .values()
        .filter(|category| category.owner() == owner)
        .cloned()
        .collect();
    owned.sort_by(|left, right| {
        left.name()
            .cmp(right.name())
            .then_with(|| left.id().cmp(&right.id()))
    });
    owned
}

fn with_counts(state: &StoreState, owner: UserId) -> Vec<CategoryWithTaskCount> {
    owned_by_name(state, owner)
        .into_iter()
        .map(|category| {
            let task_count = state.owned_task_count(category.id(), owner);
            CategoryWithTaskCount {
                category,
                task_count,
            }
        })
        .collect()
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list(&self, owner: UserId) -> CategoryRepositoryResult<Vec<Category>> {
        let state = self
            .store
            .read()
            .map_err(CategoryRepositoryError::persistence)?;
        Ok(owned_by_name(&state, owner))
    }

    async fn list_with_task_count(
        &self,
        owner: UserId,
    ) -> CategoryRepositoryResult<Vec<CategoryWithTaskCount>> {
        let state = self
            .store
            .read()
            .map_err(CategoryRepositoryError::persistence)?;
        Ok(with_counts(&state, owner))
    }

    async fn paginate(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> CategoryRepositoryResult<Page<CategoryWithTaskCount>> {
        if !page.is_valid() {
            return Err(CategoryRepositoryError::InvalidPage(page));
        }

        let state = self
            .store
            .read()
            .map_err(CategoryRepositoryError::persistence)?;
        let all = with_counts(&state, owner);
        let total = u64::try_from(all.len()).map_err(CategoryRepositoryError::persistence)?;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let per_page = usize::try_from(page.per_page()).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(offset).take(per_page).collect();
        Ok(Page::new(items, total, page))
    }

    async fn get(&self, id: CategoryId, owner: UserId) -> CategoryRepositoryResult<Category> {
        let state = self
            .store
            .read()
            .map_err(CategoryRepositoryError::persistence)?;
        state
            .categories
            .get(&id)
            .filter(|category| category.owner() == owner)
            .cloned()
            .ok_or(CategoryRepositoryError::NotFound(id))
    }

    async fn create(&self, category: &Category) -> CategoryRepositoryResult<()> {
        let mut state = self
            .store
            .write()
            .map_err(CategoryRepositoryError::persistence)?;
        if state.categories.contains_key(&category.id()) {
            return Err(CategoryRepositoryError::DuplicateCategory(category.id()));
        }
        state.categories.insert(category.id(), category.clone());
        Ok(())
    }

    async fn update(&self, category: &Category) -> CategoryRepositoryResult<()> {
        let mut state = self
            .store
            .write()
            .map_err(CategoryRepositoryError::persistence)?;
        let stored = state
            .categories
            .get_mut(&category.id())
            .filter(|stored| stored.owner() == category.owner())
            .ok_or(CategoryRepositoryError::NotFound(category.id()))?;
        *stored = category.clone();
        Ok(())
    }

    async fn delete(&self, id: CategoryId, owner: UserId) -> CategoryRepositoryResult<bool> {
        let mut state = self
            .store
            .write()
            .map_err(CategoryRepositoryError::persistence)?;
        let is_owned = state
            .categories
            .get(&id)
            .is_some_and(|category| category.owner() == owner);
        if !is_owned {
            return Err(CategoryRepositoryError::NotFound(id));
        }
        Ok(state.remove_category(id).is_some())
    }
}

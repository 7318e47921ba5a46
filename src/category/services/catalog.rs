//! Owner-scoped category management.

use crate::category::{
    domain::{Category, CategoryDomainError, CategoryId, CategoryName, CategoryWithTaskCount},
    ports::{CategoryRepository, CategoryRepositoryError},
};
use crate::pagination::{Page, PageRequest};
use crate::user::UserId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for category operations.
#[derive(Debug, Error)]
pub enum CategoryServiceError {
    /// The category does not exist among the owner's categories.
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] CategoryDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(CategoryRepositoryError),
}

impl From<CategoryRepositoryError> for CategoryServiceError {
    fn from(err: CategoryRepositoryError) -> Self {
        match err {
            CategoryRepositoryError::NotFound(id) => Self::CategoryNotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for category service operations.
pub type CategoryServiceResult<T> = Result<T, CategoryServiceError>;

fn into_service_error(err: CategoryRepositoryError, owner: UserId) -> CategoryServiceError {
    let service_error = CategoryServiceError::from(err);
    if let CategoryServiceError::CategoryNotFound(id) = service_error {
        warn!(category_id = %id, owner = %owner, "category not found");
    }
    service_error
}

/// Category management service.
#[derive(Clone)]
pub struct CategoryService<R, C>
where
    R: CategoryRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CategoryService<R, C>
where
    R: CategoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new category service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Lists the owner's categories by name.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::Repository`] when the lookup fails.
    pub async fn list_categories(&self, owner: UserId) -> CategoryServiceResult<Vec<Category>> {
        self.repository
            .list(owner)
            .await
            .map_err(|err| into_service_error(err, owner))
    }

    /// Lists the owner's categories with the number of their tasks in each.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::Repository`] when the lookup fails.
    pub async fn list_with_task_count(
        &self,
        owner: UserId,
    ) -> CategoryServiceResult<Vec<CategoryWithTaskCount>> {
        self.repository
            .list_with_task_count(owner)
            .await
            .map_err(|err| into_service_error(err, owner))
    }

    /// Returns one page of the owner's categories with task counts.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::Repository`] when the page window is
    /// invalid or the lookup fails.
    pub async fn paginate_categories(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> CategoryServiceResult<Page<CategoryWithTaskCount>> {
        self.repository
            .paginate(owner, page)
            .await
            .map_err(|err| into_service_error(err, owner))
    }

    /// Fetches one of the owner's categories.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::CategoryNotFound`] when the category
    /// is missing or owned by another user.
    pub async fn get_category(
        &self,
        id: CategoryId,
        owner: UserId,
    ) -> CategoryServiceResult<Category> {
        self.repository
            .get(id, owner)
            .await
            .map_err(|err| into_service_error(err, owner))
    }

    /// Creates a category for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::Validation`] for an invalid name or
    /// [`CategoryServiceError::Repository`] when persistence fails.
    pub async fn create_category(
        &self,
        owner: UserId,
        name: impl Into<String>,
    ) -> CategoryServiceResult<Category> {
        let category = Category::new(owner, CategoryName::new(name)?, &*self.clock);
        self.repository
            .create(&category)
            .await
            .map_err(|err| into_service_error(err, owner))?;
        info!(category_id = %category.id(), owner = %owner, "category created");
        Ok(category)
    }

    /// Renames one of the owner's categories.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::Validation`] for an invalid name or
    /// [`CategoryServiceError::CategoryNotFound`] when the category is
    /// missing or owned by another user.
    pub async fn update_category(
        &self,
        id: CategoryId,
        owner: UserId,
        name: impl Into<String>,
    ) -> CategoryServiceResult<Category> {
        let new_name = CategoryName::new(name)?;
        let mut category = self.get_category(id, owner).await?;
        category.rename(new_name, self.clock.utc());
        self.repository
            .update(&category)
            .await
            .map_err(|err| into_service_error(err, owner))?;
        info!(category_id = %id, owner = %owner, "category updated");
        Ok(category)
    }

    /// Deletes one of the owner's categories and detaches it from tasks.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::CategoryNotFound`] when the category
    /// is missing or owned by another user.
    pub async fn delete_category(
        &self,
        id: CategoryId,
        owner: UserId,
    ) -> CategoryServiceResult<bool> {
        let deleted = self
            .repository
            .delete(id, owner)
            .await
            .map_err(|err| into_service_error(err, owner))?;
        info!(category_id = %id, owner = %owner, "category deleted");
        Ok(deleted)
    }
}

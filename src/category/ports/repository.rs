//! Repository port for owner-scoped category persistence.

use crate::category::domain::{Category, CategoryId, CategoryWithTaskCount};
use crate::pagination::{Page, PageRequest};
use crate::user::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for category repository operations.
pub type CategoryRepositoryResult<T> = Result<T, CategoryRepositoryError>;

/// Category persistence contract.
///
/// Every read and write is restricted to rows owned by the given user. A
/// category owned by someone else is reported exactly like a missing one.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Returns the owner's categories ordered by name.
    async fn list(&self, owner: UserId) -> CategoryRepositoryResult<Vec<Category>>;

    /// Returns the owner's categories ordered by name, each with the number
    /// of the owner's tasks filed under it.
    async fn list_with_task_count(
        &self,
        owner: UserId,
    ) -> CategoryRepositoryResult<Vec<CategoryWithTaskCount>>;

    /// Returns one page of [`Self::list_with_task_count`].
    ///
    /// # Errors
    ///
    /// Returns [`CategoryRepositoryError::InvalidPage`] when the page number
    /// or page size is zero.
    async fn paginate(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> CategoryRepositoryResult<Page<CategoryWithTaskCount>>;

    /// Fetches one of the owner's categories.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryRepositoryError::NotFound`] when the category does
    /// not exist or belongs to another user.
    async fn get(&self, id: CategoryId, owner: UserId) -> CategoryRepositoryResult<Category>;

    /// Stores a new category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryRepositoryError::DuplicateCategory`] when the id
    /// already exists.
    async fn create(&self, category: &Category) -> CategoryRepositoryResult<()>;

    /// Persists the name and timestamps of an existing category, scoped by
    /// the category's owner.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryRepositoryError::NotFound`] when no category with
    /// the id is owned by the category's owner.
    async fn update(&self, category: &Category) -> CategoryRepositoryResult<()>;

    /// Deletes one of the owner's categories together with its task
    /// associations.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryRepositoryError::NotFound`] when the category does
    /// not exist or belongs to another user.
    async fn delete(&self, id: CategoryId, owner: UserId) -> CategoryRepositoryResult<bool>;
}

/// Errors returned by category repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CategoryRepositoryError {
    /// A category with the same identifier already exists.
    #[error("duplicate category identifier: {0}")]
    DuplicateCategory(CategoryId),

    /// The category was not found among the owner's categories.
    #[error("category not found: {0}")]
    NotFound(CategoryId),

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

impl CategoryRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for CategoryRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

//! Category aggregate and its listing projection.

use super::{CategoryId, CategoryName};
use crate::user::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// User-owned label that tasks can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    owner: UserId,
    name: CategoryName,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCategoryData {
    /// Persisted category identifier.
    pub id: CategoryId,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted name.
    pub name: CategoryName,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category for `owner`.
    #[must_use]
    pub fn new(owner: UserId, name: CategoryName, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: CategoryId::new(),
            owner,
            name,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a category from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCategoryData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            name: data.name,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the category identifier.
    #[must_use]
    pub const fn id(&self) -> CategoryId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &CategoryName {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the category and stamps the modification time.
    pub fn rename(&mut self, name: CategoryName, timestamp: DateTime<Utc>) {
        self.name = name;
        self.updated_at = timestamp;
    }
}

/// Category annotated with the number of its owner's tasks filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithTaskCount {
    /// The category.
    pub category: Category,
    /// Number of tasks owned by the category's owner that reference it.
    pub task_count: u64,
}

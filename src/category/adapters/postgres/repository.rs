//! `PostgreSQL` repository implementation for category storage.

use super::models::{CategoryRow, NewCategoryRow};
use crate::category::{
    domain::{Category, CategoryId, CategoryName, CategoryWithTaskCount, PersistedCategoryData},
    ports::{CategoryRepository, CategoryRepositoryError, CategoryRepositoryResult},
};
use crate::config::PgPool;
use crate::pagination::{Page, PageRequest};
use crate::schema::{categories, category_task, tasks};
use crate::user::UserId;
use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL`-backed category repository.
#[derive(Debug, Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CategoryRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CategoryRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CategoryRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CategoryRepositoryError::persistence)?
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list(&self, owner: UserId) -> CategoryRepositoryResult<Vec<Category>> {
        self.run_blocking(move |connection| {
            let rows = owned_by_name(owner)
                .select(CategoryRow::as_select())
                .load::<CategoryRow>(connection)?;
            rows.into_iter().map(row_to_category).collect()
        })
        .await
    }

    async fn list_with_task_count(
        &self,
        owner: UserId,
    ) -> CategoryRepositoryResult<Vec<CategoryWithTaskCount>> {
        self.run_blocking(move |connection| {
            let rows = owned_by_name(owner)
                .select(CategoryRow::as_select())
                .load::<CategoryRow>(connection)?;
            attach_task_counts(connection, owner, rows)
        })
        .await
    }

    async fn paginate(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> CategoryRepositoryResult<Page<CategoryWithTaskCount>> {
        if !page.is_valid() {
            return Err(CategoryRepositoryError::InvalidPage(page));
        }

        let limit = i64::from(page.per_page());
        let offset = i64::try_from(page.offset()).map_err(CategoryRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let row_count = categories::table
                .filter(categories::user_id.eq(owner.into_inner()))
                .select(count_star())
                .first::<i64>(connection)?;
            let rows = owned_by_name(owner)
                .select(CategoryRow::as_select())
                .limit(limit)
                .offset(offset)
                .load::<CategoryRow>(connection)?;

            let items = attach_task_counts(connection, owner, rows)?;
            let total =
                u64::try_from(row_count).map_err(CategoryRepositoryError::invalid_persisted_data)?;
            Ok(Page::new(items, total, page))
        })
        .await
    }

    async fn get(&self, id: CategoryId, owner: UserId) -> CategoryRepositoryResult<Category> {
        self.run_blocking(move |connection| {
            let row = categories::table
                .filter(categories::id.eq(id.into_inner()))
                .filter(categories::user_id.eq(owner.into_inner()))
                .select(CategoryRow::as_select())
                .first::<CategoryRow>(connection)
                .optional()?;
            row.map(row_to_category)
                .transpose()?
                .ok_or(CategoryRepositoryError::NotFound(id))
        })
        .await
    }

    async fn create(&self, category: &Category) -> CategoryRepositoryResult<()> {
        let category_id = category.id();
        let new_row = NewCategoryRow {
            id: category_id.into_inner(),
            user_id: category.owner().into_inner(),
            name: category.name().as_str().to_owned(),
            created_at: category.created_at(),
            updated_at: category.updated_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(categories::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CategoryRepositoryError::DuplicateCategory(category_id)
                    }
                    _ => CategoryRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, category: &Category) -> CategoryRepositoryResult<()> {
        let category_id = category.id();
        let owner = category.owner();
        let name = category.name().as_str().to_owned();
        let updated_at = category.updated_at();

        self.run_blocking(move |connection| {
            let changed = diesel::update(
                categories::table
                    .filter(categories::id.eq(category_id.into_inner()))
                    .filter(categories::user_id.eq(owner.into_inner())),
            )
            .set((categories::name.eq(name), categories::updated_at.eq(updated_at)))
            .execute(connection)?;
            if changed == 0 {
                return Err(CategoryRepositoryError::NotFound(category_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: CategoryId, owner: UserId) -> CategoryRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                categories::table
                    .filter(categories::id.eq(id.into_inner()))
                    .filter(categories::user_id.eq(owner.into_inner())),
            )
            .execute(connection)?;
            if removed == 0 {
                return Err(CategoryRepositoryError::NotFound(id));
            }
            Ok(true)
        })
        .await
    }
}

fn owned_by_name(owner: UserId) -> categories::BoxedQuery<'static, diesel::pg::Pg> {
    categories::table
        .filter(categories::user_id.eq(owner.into_inner()))
        .order((categories::name.asc(), categories::id.asc()))
        .into_boxed()
}

/// Counts, per category, the tasks owned by `owner` filed under it.
fn attach_task_counts(
    connection: &mut PgConnection,
    owner: UserId,
    rows: Vec<CategoryRow>,
) -> CategoryRepositoryResult<Vec<CategoryWithTaskCount>> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let counts: HashMap<Uuid, i64> = category_task::table
        .inner_join(tasks::table)
        .filter(tasks::user_id.eq(owner.into_inner()))
        .filter(category_task::category_id.eq_any(ids))
        .group_by(category_task::category_id)
        .select((category_task::category_id, count_star()))
        .load::<(Uuid, i64)>(connection)?
        .into_iter()
        .collect();

    rows.into_iter()
        .map(|row| {
            let count = counts.get(&row.id).copied().unwrap_or_default();
            let task_count =
                u64::try_from(count).map_err(CategoryRepositoryError::invalid_persisted_data)?;
            Ok(CategoryWithTaskCount {
                category: row_to_category(row)?,
                task_count,
            })
        })
        .collect()
}

fn row_to_category(row: CategoryRow) -> CategoryRepositoryResult<Category> {
    let CategoryRow {
        id,
        user_id,
        name: persisted_name,
        created_at,
        updated_at,
    } = row;

    let name =
        CategoryName::new(persisted_name).map_err(CategoryRepositoryError::invalid_persisted_data)?;
    Ok(Category::from_persisted(PersistedCategoryData {
        id: CategoryId::from_uuid(id),
        owner: UserId::from_uuid(user_id),
        name,
        created_at,
        updated_at,
    }))
}

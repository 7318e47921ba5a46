//! `PostgreSQL` repository implementation for task storage.

use super::models::{CategoryTaskRow, NewTaskRow, TaskChangesetRow, TaskRow};
use crate::category::domain::CategoryId;
use crate::config::PgPool;
use crate::pagination::Page;
use crate::schema::{categories, category_task, tasks};
use crate::task::{
    domain::{
        CompletionFilter, PersistedTaskData, SortDirection, Task, TaskId, TaskPriority, TaskQuery,
        TaskSortField, TaskStatus, TaskTitle,
    },
    ports::{
        repository::check_category_ownership, TaskEdit, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult,
    },
};
use crate::user::UserId;
use async_trait::async_trait;
use diesel::dsl::{count_star, exists, sql};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Integer;
use std::collections::BTreeSet;
use uuid::Uuid;

type BoxedTaskQuery = tasks::BoxedQuery<'static, Pg>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Page<Task>> {
        let request = query.page_request();
        if !request.is_valid() {
            return Err(TaskRepositoryError::InvalidPage(request));
        }

        let listing = *query;
        let limit = i64::from(request.per_page());
        let offset = i64::try_from(request.offset()).map_err(TaskRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let row_count = filtered(&listing)
                .select(count_star())
                .first::<i64>(connection)?;
            let rows = ordered(filtered(&listing), &listing)
                .select(TaskRow::as_select())
                .limit(limit)
                .offset(offset)
                .load::<TaskRow>(connection)?;

            let items = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            let total =
                u64::try_from(row_count).map_err(TaskRepositoryError::invalid_persisted_data)?;
            Ok(Page::new(items, total, request))
        })
        .await
    }

    async fn get(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task)
                .transpose()?
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }

    async fn belongs_to_owner(&self, id: TaskId, owner: UserId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let owned = diesel::select(exists(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::user_id.eq(owner.into_inner())),
            ))
            .get_result::<bool>(connection)?;
            Ok(owned)
        })
        .await
    }

    async fn create(&self, task: &Task, categories: &[CategoryId]) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let owner = task.owner();
        let new_row = to_new_row(task);
        let requested = categories.to_vec();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                ensure_categories_owned(tx, owner, &requested)?;
                diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .execute(tx)
                    .map_err(|err| map_insert_error(err, task_id))?;
                insert_associations(tx, task_id, &requested)
            })
        })
        .await
    }

    async fn update(
        &self,
        id: TaskId,
        edit: TaskEdit,
        categories: Option<Vec<CategoryId>>,
    ) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let current = tasks::table
                    .find(id.into_inner())
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(tx)
                    .optional()?
                    .ok_or(TaskRepositoryError::NotFound(id))?;

                let edited = edit(row_to_task(current)?);
                if let Some(ref ids) = categories {
                    ensure_categories_owned(tx, edited.owner(), ids)?;
                }

                diesel::update(tasks::table.find(id.into_inner()))
                    .set(&to_changeset(&edited))
                    .execute(tx)?;

                if let Some(ref ids) = categories {
                    sync_associations(tx, id, ids)?;
                }
                Ok(edited)
            })
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            if removed == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(true)
        })
        .await
    }

    async fn category_ids(&self, id: TaskId) -> TaskRepositoryResult<Vec<CategoryId>> {
        self.run_blocking(move |connection| {
            let task_exists = diesel::select(exists(tasks::table.find(id.into_inner())))
                .get_result::<bool>(connection)?;
            if !task_exists {
                return Err(TaskRepositoryError::NotFound(id));
            }

            let ids = category_task::table
                .filter(category_task::task_id.eq(id.into_inner()))
                .select(category_task::category_id)
                .order(category_task::category_id.asc())
                .load::<Uuid>(connection)?;
            Ok(ids.into_iter().map(CategoryId::from_uuid).collect())
        })
        .await
    }
}

fn filtered(query: &TaskQuery) -> BoxedTaskQuery {
    let filters = &query.filters;
    let mut statement = tasks::table.into_boxed();

    if let Some(owner) = query.owner {
        statement = statement.filter(tasks::user_id.eq(owner.into_inner()));
    }
    if let Some(status) = filters.status {
        statement = statement.filter(tasks::status.eq(status.as_str()));
    }
    if let Some(priority) = filters.priority {
        statement = statement.filter(tasks::priority.eq(priority.as_str()));
    }
    match filters.completion {
        Some(CompletionFilter::Completed) => {
            statement = statement.filter(tasks::completed_at.is_not_null());
        }
        Some(CompletionFilter::Incomplete) => {
            statement = statement.filter(tasks::completed_at.is_null());
        }
        None => {}
    }
    if let Some(category) = filters.category {
        let associated = category_task::table
            .filter(category_task::category_id.eq(category.into_inner()))
            .select(category_task::task_id);
        statement = statement.filter(tasks::id.eq_any(associated));
    }
    statement
}

macro_rules! order_in {
    ($statement:expr, $expression:expr, $direction:expr) => {
        match $direction {
            SortDirection::Asc => $statement.order_by($expression.asc()),
            SortDirection::Desc => $statement.order_by($expression.desc()),
        }
    };
}

/// Applies the requested ordering followed by the id tie-break.
///
/// `PostgreSQL` places `NULL` last in ascending and first in descending
/// order, which is the exact reverse relation the in-memory adapter uses.
fn ordered(statement: BoxedTaskQuery, query: &TaskQuery) -> BoxedTaskQuery {
    let (field, direction) = query.sort.resolved();
    let sorted = match field {
        TaskSortField::CreatedAt => order_in!(statement, tasks::created_at, direction),
        TaskSortField::UpdatedAt => order_in!(statement, tasks::updated_at, direction),
        TaskSortField::DueDate => order_in!(statement, tasks::due_date, direction),
        TaskSortField::CompletedAt => order_in!(statement, tasks::completed_at, direction),
        TaskSortField::Title => order_in!(statement, tasks::title, direction),
        TaskSortField::Priority => {
            let rank = sql::<Integer>(&rank_case(
                "priority",
                TaskPriority::ALL.map(TaskPriority::as_str),
            ));
            order_in!(statement, rank, direction)
        }
        TaskSortField::Status => {
            let rank = sql::<Integer>(&rank_case(
                "status",
                TaskStatus::ALL.map(TaskStatus::as_str),
            ));
            order_in!(statement, rank, direction)
        }
    };
    sorted.then_order_by(tasks::id.asc())
}

/// Builds a `CASE` expression ranking tokens by their declaration order.
fn rank_case<const N: usize>(column: &str, tokens: [&'static str; N]) -> String {
    let arms: String = tokens
        .iter()
        .zip(0_u32..)
        .map(|(token, rank)| format!(" WHEN '{token}' THEN {rank}"))
        .collect();
    format!("CASE {column}{arms} END")
}

/// Rejects requested categories that are missing, owned by someone else or
/// repeated.
///
/// Matching rows are share-locked so they cannot be deleted before the
/// surrounding transaction commits its associations.
fn ensure_categories_owned(
    connection: &mut PgConnection,
    owner: UserId,
    requested: &[CategoryId],
) -> TaskRepositoryResult<()> {
    if requested.is_empty() {
        return Ok(());
    }

    let ids: Vec<Uuid> = requested.iter().map(|id| id.into_inner()).collect();
    let owned: BTreeSet<CategoryId> = categories::table
        .filter(categories::id.eq_any(ids))
        .filter(categories::user_id.eq(owner.into_inner()))
        .select(categories::id)
        .for_share()
        .load::<Uuid>(connection)?
        .into_iter()
        .map(CategoryId::from_uuid)
        .collect();
    check_category_ownership(owner, requested, &owned)
}

/// Inserts associations, leaving rows that already exist untouched.
fn insert_associations(
    connection: &mut PgConnection,
    task_id: TaskId,
    category_ids: &[CategoryId],
) -> TaskRepositoryResult<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<CategoryTaskRow> = category_ids
        .iter()
        .map(|category_id| CategoryTaskRow {
            task_id: task_id.into_inner(),
            category_id: category_id.into_inner(),
        })
        .collect();
    diesel::insert_into(category_task::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(connection)?;
    Ok(())
}

/// Makes the task's association set exactly `category_ids`.
///
/// Only rows outside the new set are deleted, so unchanged associations keep
/// their original rows.
fn sync_associations(
    connection: &mut PgConnection,
    task_id: TaskId,
    category_ids: &[CategoryId],
) -> TaskRepositoryResult<()> {
    let keep: Vec<Uuid> = category_ids.iter().map(|id| id.into_inner()).collect();
    diesel::delete(
        category_task::table
            .filter(category_task::task_id.eq(task_id.into_inner()))
            .filter(category_task::category_id.ne_all(keep)),
    )
    .execute(connection)?;
    insert_associations(connection, task_id, category_ids)
}

fn map_insert_error(err: DieselError, task_id: TaskId) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TaskRepositoryError::DuplicateTask(task_id)
        }
        _ => TaskRepositoryError::persistence(err),
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        user_id: task.owner().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        completed_at: task.completed_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangesetRow {
    TaskChangesetRow {
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        completed_at: task.completed_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        user_id,
        title: persisted_title,
        description,
        status: persisted_status,
        priority: persisted_priority,
        due_date,
        completed_at,
        created_at,
        updated_at,
    } = row;

    let title =
        TaskTitle::new(persisted_title).map_err(TaskRepositoryError::invalid_persisted_data)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: UserId::from_uuid(user_id),
        title,
        description,
        status,
        priority,
        due_date,
        completed_at,
        created_at,
        updated_at,
    }))
}

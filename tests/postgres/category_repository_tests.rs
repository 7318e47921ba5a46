//! Category persistence against `PostgreSQL`.

use super::helpers::{PgApp, pg_app};
use rstest::rstest;
use taskboard::category::services::CategoryServiceError;
use taskboard::pagination::PageRequest;
use taskboard::task::services::CreateTaskRequest;
use taskboard::user::UserId;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn categories_list_by_name_with_owner_scoped_counts(pg_app: Option<PgApp>) {
    let Some(app) = pg_app else { return };
    let owner = UserId::new();
    let other = UserId::new();
    let zeta = app
        .categories
        .create_category(owner, "Zeta")
        .await
        .expect("category creation should succeed");
    app.categories
        .create_category(owner, "Alpha")
        .await
        .expect("category creation should succeed");
    app.categories
        .create_category(other, "Other")
        .await
        .expect("category creation should succeed");
    for title in ["one", "two"] {
        app.tasks
            .create_task(owner, CreateTaskRequest::new(title).with_categories([zeta.id()]))
            .await
            .expect("task creation should succeed");
    }

    let counted: Vec<(String, u64)> = app
        .categories
        .list_with_task_count(owner)
        .await
        .expect("listing should succeed")
        .into_iter()
        .map(|entry| (entry.category.name().to_string(), entry.task_count))
        .collect();

    assert_eq!(counted, [("Alpha".to_owned(), 0), ("Zeta".to_owned(), 2)]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paginated_categories_report_totals(pg_app: Option<PgApp>) {
    let Some(app) = pg_app else { return };
    let owner = UserId::new();
    for index in 0..12 {
        app.categories
            .create_category(owner, format!("Category {index:02}"))
            .await
            .expect("category creation should succeed");
    }

    let second = app
        .categories
        .paginate_categories(owner, PageRequest::new(2, 10))
        .await
        .expect("pagination should succeed");

    assert_eq!(second.total, 12);
    assert_eq!(second.items.len(), 2);
    assert_eq!(
        second.items.first().map(|entry| entry.category.name().to_string()),
        Some("Category 10".to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rename_persists_and_foreign_owner_cannot_see_it(pg_app: Option<PgApp>) {
    let Some(app) = pg_app else { return };
    let owner = UserId::new();
    let category = app
        .categories
        .create_category(owner, "Draft")
        .await
        .expect("category creation should succeed");

    app.categories
        .update_category(category.id(), owner, " Final ")
        .await
        .expect("rename should succeed");
    let fetched = app
        .categories
        .get_category(category.id(), owner)
        .await
        .expect("category should exist");
    let foreign = app
        .categories
        .update_category(category.id(), UserId::new(), "Hijacked")
        .await;

    assert_eq!(fetched.name().as_str(), "Final");
    assert!(matches!(
        foreign,
        Err(CategoryServiceError::CategoryNotFound(id)) if id == category.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_category_detaches_tasks(pg_app: Option<PgApp>) {
    let Some(app) = pg_app else { return };
    let owner = UserId::new();
    let category = app
        .categories
        .create_category(owner, "Short lived")
        .await
        .expect("category creation should succeed");
    let task = app
        .tasks
        .create_task(owner, CreateTaskRequest::new("Keeper").with_categories([category.id()]))
        .await
        .expect("task creation should succeed");

    let deleted = app
        .categories
        .delete_category(category.id(), owner)
        .await
        .expect("delete should succeed");

    assert!(deleted);
    assert!(
        app.tasks
            .task_categories(task.id(), Some(owner))
            .await
            .expect("task should survive")
            .is_empty()
    );
}

//! Category ownership, association sync and cascading deletes.

use super::helpers::{App, app};
use rstest::rstest;
use taskboard::category::domain::CategoryId;
use taskboard::category::services::CategoryServiceError;
use taskboard::task::domain::{TaskFilters, TaskSort};
use taskboard::task::services::{CreateTaskRequest, TaskServiceError, UpdateTaskRequest};
use taskboard::user::UserId;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_category_rejects_creation_without_writes(app: App) {
    let owner = UserId::new();
    let stranger = UserId::new();
    let mine = app
        .categories
        .create_category(owner, "Mine")
        .await
        .expect("category creation should succeed");
    let theirs = app
        .categories
        .create_category(stranger, "Theirs")
        .await
        .expect("category creation should succeed");

    let result = app
        .tasks
        .create_task(
            owner,
            CreateTaskRequest::new("Mixed").with_categories([mine.id(), theirs.id()]),
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskServiceError::InvalidCategoryOwnership { ref rejected, .. })
            if rejected == &vec![theirs.id()]
    ));
    let listed = app
        .tasks
        .list_tasks(TaskFilters::new(), TaskSort::default(), None)
        .await
        .expect("listing should succeed");
    assert_eq!(listed.total, 0);
    assert_eq!(app.store.association_count().expect("count"), 0);
    assert!(app.publisher.events().expect("events").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn category_sync_is_idempotent(app: App) {
    let owner = UserId::new();
    let first = app
        .categories
        .create_category(owner, "First")
        .await
        .expect("category creation should succeed");
    let second = app
        .categories
        .create_category(owner, "Second")
        .await
        .expect("category creation should succeed");
    let task = app
        .tasks
        .create_task(owner, CreateTaskRequest::new("Labelled"))
        .await
        .expect("task creation should succeed");

    for _ in 0..3 {
        app.tasks
            .update_task(
                task.id(),
                UpdateTaskRequest::new().with_categories([first.id(), second.id()]),
                Some(owner),
            )
            .await
            .expect("sync should succeed");
    }

    let mut expected = vec![first.id(), second.id()];
    expected.sort();
    assert_eq!(
        app.tasks
            .task_categories(task.id(), Some(owner))
            .await
            .expect("categories"),
        expected
    );
    assert_eq!(app.store.association_count().expect("count"), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn category_counts_and_filter_follow_associations(app: App) {
    let owner = UserId::new();
    let work = app
        .categories
        .create_category(owner, "Work")
        .await
        .expect("category creation should succeed");
    let home = app
        .categories
        .create_category(owner, "Home")
        .await
        .expect("category creation should succeed");
    for title in ["Report", "Slides"] {
        app.tasks
            .create_task(owner, CreateTaskRequest::new(title).with_categories([work.id()]))
            .await
            .expect("task creation should succeed");
    }
    app.tasks
        .create_task(owner, CreateTaskRequest::new("Laundry").with_categories([home.id()]))
        .await
        .expect("task creation should succeed");

    let counts: Vec<(String, u64)> = app
        .categories
        .list_with_task_count(owner)
        .await
        .expect("listing should succeed")
        .into_iter()
        .map(|entry| (entry.category.name().as_str().to_owned(), entry.task_count))
        .collect();
    assert_eq!(
        counts,
        [("Home".to_owned(), 1), ("Work".to_owned(), 2)]
    );

    let in_work = app
        .tasks
        .list_tasks(
            TaskFilters::new().with_category(work.id()),
            TaskSort::default(),
            Some(owner),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(in_work.total, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_removes_its_associations(app: App) {
    let owner = UserId::new();
    let category = app
        .categories
        .create_category(owner, "Errands")
        .await
        .expect("category creation should succeed");
    let task = app
        .tasks
        .create_task(
            owner,
            CreateTaskRequest::new("Post office").with_categories([category.id()]),
        )
        .await
        .expect("task creation should succeed");

    app.tasks
        .delete_task(task.id(), Some(owner))
        .await
        .expect("delete should succeed");

    assert_eq!(app.store.association_count().expect("count"), 0);
    let counted = app
        .categories
        .list_with_task_count(owner)
        .await
        .expect("listing should succeed");
    assert_eq!(counted.first().map(|entry| entry.task_count), Some(0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn categories_of_other_owners_are_invisible(app: App) {
    let owner = UserId::new();
    let category = app
        .categories
        .create_category(owner, "Secret")
        .await
        .expect("category creation should succeed");

    let result = app
        .categories
        .get_category(category.id(), UserId::new())
        .await;
    let missing = app
        .categories
        .get_category(CategoryId::new(), owner)
        .await;

    assert!(matches!(result, Err(CategoryServiceError::CategoryNotFound(_))));
    assert!(matches!(missing, Err(CategoryServiceError::CategoryNotFound(_))));
}

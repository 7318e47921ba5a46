//! Listing behaviour across owners, filters and pages.

use super::helpers::{App, app};
use rstest::rstest;
use taskboard::task::domain::{
    RawTaskFilters, SortDirection, TaskFilters, TaskPriority, TaskSort, TaskSortField,
};
use taskboard::task::services::{CreateTaskRequest, TaskServiceError};
use taskboard::user::UserId;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_listing_counts_only_owner_tasks(app: App) {
    let alice = UserId::new();
    let bob = UserId::new();
    app.seed_tasks(alice, 15).await;
    app.seed_tasks(bob, 5).await;

    let page = app
        .tasks
        .list_tasks(TaskFilters::new(), TaskSort::default(), Some(alice))
        .await
        .expect("listing should succeed");

    assert_eq!(page.total, 15);
    assert_eq!(page.per_page, 10);
    assert_eq!(page.page, 1);
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.last_page(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_page_size_pages_the_full_set(app: App) {
    let owner = UserId::new();
    app.seed_tasks(owner, 30).await;

    let page = app
        .tasks
        .list_tasks(
            TaskFilters::new().with_per_page(5).with_page(6),
            TaskSort::default(),
            None,
        )
        .await
        .expect("listing should succeed");

    assert_eq!(page.total, 30);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.last_page(), 6);
    assert!(!page.has_more_pages());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pages_beyond_the_last_are_empty(app: App) {
    let owner = UserId::new();
    app.seed_tasks(owner, 3).await;

    let page = app
        .tasks
        .list_tasks(TaskFilters::new().with_page(9), TaskSort::default(), None)
        .await
        .expect("listing should succeed");

    assert_eq!(page.total, 3);
    assert!(page.items.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn raw_parameters_drive_filtered_sorted_listing(app: App) {
    let owner = UserId::new();
    for (title, priority) in [
        ("backup", TaskPriority::Medium),
        ("outage", TaskPriority::Urgent),
        ("typo", TaskPriority::Low),
        ("billing", TaskPriority::Urgent),
    ] {
        app.tasks
            .create_task(owner, CreateTaskRequest::new(title).with_priority(priority))
            .await
            .expect("task creation should succeed");
    }

    let filters = TaskFilters::try_from(RawTaskFilters {
        priority: Some("urgent".to_owned()),
        completed: Some("no".to_owned()),
        ..RawTaskFilters::default()
    })
    .expect("raw filters should convert");
    let sort = TaskSort::parse(Some("title"), Some("asc")).expect("sort should parse");

    let titles: Vec<String> = app
        .tasks
        .list_tasks(filters, sort, Some(owner))
        .await
        .expect("listing should succeed")
        .items
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect();

    assert_eq!(titles, ["billing", "outage"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priority_descending_puts_urgent_first(app: App) {
    let owner = UserId::new();
    for priority in TaskPriority::ALL {
        app.tasks
            .create_task(
                owner,
                CreateTaskRequest::new(priority.as_str()).with_priority(priority),
            )
            .await
            .expect("task creation should succeed");
    }

    let page = app
        .tasks
        .list_tasks(
            TaskFilters::new(),
            TaskSort::by(TaskSortField::Priority, SortDirection::Desc),
            Some(owner),
        )
        .await
        .expect("listing should succeed");
    let priorities: Vec<TaskPriority> = page.items.iter().map(|task| task.priority()).collect();

    assert_eq!(
        priorities,
        [
            TaskPriority::Urgent,
            TaskPriority::High,
            TaskPriority::Medium,
            TaskPriority::Low
        ]
    );
}

#[rstest]
#[case::zero_page(TaskFilters::new().with_page(0))]
#[case::zero_size(TaskFilters::new().with_per_page(0))]
#[tokio::test(flavor = "multi_thread")]
async fn empty_page_windows_are_rejected(app: App, #[case] filters: TaskFilters) {
    let result = app
        .tasks
        .list_tasks(filters, TaskSort::default(), None)
        .await;

    assert!(matches!(result, Err(TaskServiceError::Repository(_))));
}

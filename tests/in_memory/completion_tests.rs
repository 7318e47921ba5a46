//! Completion timestamps across status changes and the completed flag.

use super::helpers::{App, app};
use chrono::Duration;
use mockable::Clock;
use rstest::rstest;
use taskboard::task::domain::{CompletionFilter, TaskFilters, TaskSort, TaskStatus};
use taskboard::task::services::{CreateTaskRequest, UpdateTaskRequest};
use taskboard::user::UserId;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_at_tracks_status_round_trip(app: App) {
    let owner = UserId::new();
    let task = app
        .tasks
        .create_task(owner, CreateTaskRequest::new("Ship release"))
        .await
        .expect("task creation should succeed");
    app.clock.advance(Duration::minutes(30));
    let completion_time = app.clock.utc();

    let completed = app
        .tasks
        .update_task(
            task.id(),
            UpdateTaskRequest::new().with_status(TaskStatus::Completed),
            Some(owner),
        )
        .await
        .expect("completion should succeed");
    assert_eq!(completed.completed_at(), Some(completion_time));

    app.clock.advance(Duration::minutes(30));
    let reopened = app
        .tasks
        .update_task(
            task.id(),
            UpdateTaskRequest::new().with_status(TaskStatus::Pending),
            Some(owner),
        )
        .await
        .expect("reopen should succeed");
    assert_eq!(reopened.completed_at(), None);
    assert_eq!(reopened.status(), TaskStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_flag_completes_and_lists_as_completed(app: App) {
    let owner = UserId::new();
    let task = app
        .tasks
        .create_task(owner, CreateTaskRequest::new("Tick the box"))
        .await
        .expect("task creation should succeed");

    let request = app.tasks.apply_completed_flag(UpdateTaskRequest::new(), true);
    let updated = app
        .tasks
        .update_task(task.id(), request, Some(owner))
        .await
        .expect("update should succeed");
    assert_eq!(updated.status(), TaskStatus::Completed);
    assert_eq!(updated.completed_at(), Some(app.clock.utc()));

    let completed = app
        .tasks
        .list_tasks(
            TaskFilters::new().with_completion(CompletionFilter::Completed),
            TaskSort::default(),
            Some(owner),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(completed.total, 1);

    let open = app
        .tasks
        .list_tasks(
            TaskFilters::new().with_completion(CompletionFilter::Incomplete),
            TaskSort::default(),
            Some(owner),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(open.total, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unchecked_flag_clears_timestamp_without_touching_status(app: App) {
    let owner = UserId::new();
    let task = app
        .tasks
        .create_task(
            owner,
            CreateTaskRequest::new("Half done").with_status(TaskStatus::InProgress),
        )
        .await
        .expect("task creation should succeed");

    let request = app.tasks.apply_completed_flag(UpdateTaskRequest::new(), false);
    let updated = app
        .tasks
        .update_task(task.id(), request, Some(owner))
        .await
        .expect("update should succeed");

    assert_eq!(updated.status(), TaskStatus::InProgress);
    assert_eq!(updated.completed_at(), None);
}

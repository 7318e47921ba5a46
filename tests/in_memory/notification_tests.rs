//! Task creation events handed to the notification dispatcher.

use super::helpers::{App, SteppingClock, app};
use rstest::rstest;
use std::sync::Arc;
use taskboard::store::InMemoryStore;
use taskboard::task::adapters::channel::ChannelTaskEventPublisher;
use taskboard::task::domain::{TaskEvent, TaskFilters, TaskSort};
use taskboard::task::services::{CreateTaskRequest, TaskService, UpdateTaskRequest};
use taskboard::user::UserId;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_creation_is_announced(app: App) {
    let owner = UserId::new();
    let task = app
        .tasks
        .create_task(owner, CreateTaskRequest::new("Announce"))
        .await
        .expect("task creation should succeed");
    app.tasks
        .update_task(task.id(), UpdateTaskRequest::new().with_title("Renamed"), None)
        .await
        .expect("update should succeed");

    let events = app.publisher.events().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events.first().map(TaskEvent::recipient), Some(owner));
    assert_eq!(events.first().map(TaskEvent::task_id), Some(task.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn channel_publisher_delivers_created_task() {
    let store = InMemoryStore::new();
    let (publisher, mut receiver) = ChannelTaskEventPublisher::bounded(4);
    let service = TaskService::new(
        Arc::new(store.task_repository()),
        Arc::new(publisher),
        Arc::new(SteppingClock::default()),
    );

    let task = service
        .create_task(UserId::new(), CreateTaskRequest::new("Queued"))
        .await
        .expect("task creation should succeed");

    let received = receiver.recv().await.expect("event should be queued");
    assert_eq!(received, TaskEvent::Created { task });
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_or_closed_channel_does_not_fail_creation() {
    let store = InMemoryStore::new();
    let (publisher, receiver) = ChannelTaskEventPublisher::bounded(1);
    let service = TaskService::new(
        Arc::new(store.task_repository()),
        Arc::new(publisher),
        Arc::new(SteppingClock::default()),
    );
    let owner = UserId::new();

    service
        .create_task(owner, CreateTaskRequest::new("Fills the queue"))
        .await
        .expect("first creation should succeed");
    service
        .create_task(owner, CreateTaskRequest::new("Overflows the queue"))
        .await
        .expect("creation should succeed with a full queue");
    drop(receiver);
    service
        .create_task(owner, CreateTaskRequest::new("After shutdown"))
        .await
        .expect("creation should succeed with a closed queue");

    let store_view = service
        .list_tasks(TaskFilters::new(), TaskSort::default(), Some(owner))
        .await
        .expect("listing should succeed");
    assert_eq!(store_view.total, 3);
}

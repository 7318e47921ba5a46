//! Shared test helpers for in-memory integration tests.

use chrono::Duration;
use rstest::fixture;
use std::sync::Arc;
use taskboard::category::{adapters::memory::InMemoryCategoryRepository, services::CategoryService};
use taskboard::store::InMemoryStore;
use taskboard::task::{
    adapters::memory::{InMemoryTaskRepository, RecordingTaskEventPublisher},
    domain::Task,
    services::{CreateTaskRequest, TaskService},
};
use taskboard::user::UserId;

pub use crate::test_helpers::SteppingClock;
use crate::test_helpers::init_tracing;

/// Task service wired to the in-memory adapters.
pub type Tasks = TaskService<InMemoryTaskRepository, RecordingTaskEventPublisher, SteppingClock>;

/// Category service wired to the in-memory adapters.
pub type Categories = CategoryService<InMemoryCategoryRepository, SteppingClock>;

/// Services sharing one in-memory store.
pub struct App {
    pub store: InMemoryStore,
    pub clock: Arc<SteppingClock>,
    pub publisher: Arc<RecordingTaskEventPublisher>,
    pub tasks: Tasks,
    pub categories: Categories,
}

impl App {
    /// Wires both services over a fresh store.
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        let store = InMemoryStore::new();
        let clock = Arc::new(SteppingClock::default());
        let publisher = Arc::new(RecordingTaskEventPublisher::new());
        let tasks = TaskService::new(
            Arc::new(store.task_repository()),
            Arc::clone(&publisher),
            Arc::clone(&clock),
        );
        let categories =
            CategoryService::new(Arc::new(store.category_repository()), Arc::clone(&clock));
        Self {
            store,
            clock,
            publisher,
            tasks,
            categories,
        }
    }

    /// Creates `count` tasks for `owner`, one second apart.
    pub async fn seed_tasks(&self, owner: UserId, count: usize) -> Vec<Task> {
        let mut created = Vec::with_capacity(count);
        for index in 0..count {
            let task = self
                .tasks
                .create_task(owner, CreateTaskRequest::new(format!("Task {index:03}")))
                .await
                .expect("seed task creation should succeed");
            self.clock.advance(Duration::seconds(1));
            created.push(task);
        }
        created
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Provides freshly wired services for each test.
#[fixture]
pub fn app() -> App {
    App::new()
}

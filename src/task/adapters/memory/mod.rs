//! In-memory adapters for task persistence and event publication.

mod publisher;
mod task;

pub use publisher::RecordingTaskEventPublisher;
pub use task::InMemoryTaskRepository;

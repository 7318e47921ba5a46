//! Recording task event publisher for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::TaskEvent,
    ports::{PublishError, TaskEventPublisher},
};

/// Publisher that keeps every accepted event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingTaskEventPublisher {
    events: Arc<RwLock<Vec<TaskEvent>>>,
    reject_with: Option<PublishError>,
}

impl RecordingTaskEventPublisher {
    /// Creates a publisher that accepts every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a publisher that rejects every event with `error`.
    #[must_use]
    pub fn rejecting(error: PublishError) -> Self {
        Self {
            events: Arc::default(),
            reject_with: Some(error),
        }
    }

    /// Returns the events accepted so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Delivery`] when the event log lock is
    /// poisoned.
    pub fn events(&self) -> Result<Vec<TaskEvent>, PublishError> {
        let events = self
            .events
            .read()
            .map_err(|err| PublishError::delivery(std::io::Error::other(err.to_string())))?;
        Ok(events.clone())
    }
}

#[async_trait]
impl TaskEventPublisher for RecordingTaskEventPublisher {
    async fn publish(&self, event: TaskEvent) -> Result<(), PublishError> {
        if let Some(ref error) = self.reject_with {
            return Err(error.clone());
        }

        let mut events = self
            .events
            .write()
            .map_err(|err| PublishError::delivery(std::io::Error::other(err.to_string())))?;
        events.push(event);
        Ok(())
    }
}

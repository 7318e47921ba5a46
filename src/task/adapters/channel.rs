//! Channel-backed task event publisher.
//!
//! Events are queued on a bounded `tokio` channel whose receiving half is
//! drained by the notification dispatcher, so task writes never wait on
//! delivery.

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::task::{
    domain::TaskEvent,
    ports::{PublishError, TaskEventPublisher},
};

/// Publisher that enqueues events for an asynchronous dispatcher.
#[derive(Debug, Clone)]
pub struct ChannelTaskEventPublisher {
    sender: mpsc::Sender<TaskEvent>,
}

impl ChannelTaskEventPublisher {
    /// Creates a publisher over an existing sender.
    #[must_use]
    pub const fn new(sender: mpsc::Sender<TaskEvent>) -> Self {
        Self { sender }
    }

    /// Creates a publisher and the receiver the dispatcher should drain.
    ///
    /// `capacity` must be positive.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<TaskEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl TaskEventPublisher for ChannelTaskEventPublisher {
    async fn publish(&self, event: TaskEvent) -> Result<(), PublishError> {
        self.sender.try_send(event).map_err(|err| match err {
            TrySendError::Full(_) => PublishError::Full,
            TrySendError::Closed(_) => PublishError::Closed,
        })
    }
}

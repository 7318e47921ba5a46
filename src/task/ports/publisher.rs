//! Outbound port for task events.

use crate::task::domain::TaskEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Hands task events to the asynchronous notification dispatcher.
///
/// Publication is fire-and-forget from the caller's perspective: a failure
/// is reported but never undoes the change that produced the event.
#[async_trait]
pub trait TaskEventPublisher: Send + Sync {
    /// Publishes an event.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the dispatcher cannot accept the event.
    async fn publish(&self, event: TaskEvent) -> Result<(), PublishError>;
}

/// Errors returned by task event publishers.
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// The dispatcher has shut down.
    #[error("task event dispatcher is closed")]
    Closed,

    /// The dispatcher queue is at capacity.
    #[error("task event dispatcher queue is full")]
    Full,

    /// Transport-level failure.
    #[error("task event delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl PublishError {
    /// Wraps a transport error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}

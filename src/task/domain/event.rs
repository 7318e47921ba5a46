//! Outbound task events consumed by the notification dispatcher.

use super::{Task, TaskId};
use crate::user::UserId;
use serde::{Deserialize, Serialize};

/// Event emitted after a task change has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// A task was created; its owner should be informed.
    Created {
        /// The task as stored.
        task: Task,
    },
}

impl TaskEvent {
    /// Returns the identifier of the task the event concerns.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        match self {
            Self::Created { task } => task.id(),
        }
    }

    /// Returns the user to notify.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        match self {
            Self::Created { task } => task.owner(),
        }
    }
}

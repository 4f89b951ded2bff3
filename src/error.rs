use std::time::Duration;

use thiserror::Error;

use crate::task::TaskId;

/// Bad or missing input at task-entry time. The task is not created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task description must not be empty")]
    EmptyDescription,

    #[error("Destination (phone number) must not be empty")]
    EmptyDestination,

    #[error("Invalid deadline '{input}': expected YYYY-MM-DD HH:MM")]
    InvalidDeadline { input: String },
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Task store error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Task store lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task store worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, TaskError>;

/// A reminder that could not be delivered. Logged by the scheduler, never retried.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Gateway rejected message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Gateway transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gateway did not answer within {0:?}")]
    TimedOut(Duration),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    #[error("Send abandoned at shutdown")]
    Cancelled,
}

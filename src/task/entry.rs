//! Task entry: trim and validate raw input, then insert

use tracing::info;

use super::{parse_deadline, TaskId};
use crate::error::{Result, ValidationError};
use crate::store::TaskStore;

/// Raw fields as typed (or spoken) by the user.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub description: String,
    pub deadline: String,
    pub destination: String,
}

impl NewTask {
    pub fn new(
        description: impl Into<String>,
        deadline: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            deadline: deadline.into(),
            destination: destination.into(),
        }
    }

    /// Trimmed copy of the fields, checked in display order so the user sees
    /// the first problem in the form they filled in.
    pub fn validated(&self) -> std::result::Result<NewTask, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let deadline = self.deadline.trim();
        parse_deadline(deadline)?;

        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(ValidationError::EmptyDestination);
        }

        Ok(NewTask::new(description, deadline, destination))
    }
}

/// Validate `new` and insert it as a pending task.
pub fn add_task(store: &TaskStore, new: &NewTask) -> Result<TaskId> {
    let task = new.validated()?;
    let id = store.insert(&task.description, &task.deadline, &task.destination)?;
    info!("task {} added: {} at {}", id, task.description, task.deadline);
    Ok(id)
}

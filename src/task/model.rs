//! Task data model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// `chrono` format of a deadline, e.g. `2026-02-15 09:30`.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Row id assigned by the store. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse().ok().map(Self)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a deadline in the fixed `YYYY-MM-DD HH:MM` local-time format.
pub fn parse_deadline(input: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(input, DEADLINE_FORMAT).map_err(|_| {
        ValidationError::InvalidDeadline {
            input: input.to_string(),
        }
    })
}

/// A reminder task as persisted in the `tasks` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    /// What to be reminded of; also the notification body.
    pub description: String,

    /// Deadline text exactly as stored. Parsed on every scan so a corrupt
    /// legacy row is skipped instead of failing the whole cycle.
    pub deadline: String,

    /// Contact address handed to the notifier (usually a phone number).
    pub destination: String,

    /// Set once, by the scheduler, after the notification attempt.
    pub done: bool,
}

impl Task {
    pub fn deadline_at(&self) -> Result<NaiveDateTime, ValidationError> {
        parse_deadline(&self.deadline)
    }

    /// Eligible for a notification at `now`: still pending and the deadline has passed.
    pub fn is_due(&self, now: NaiveDateTime) -> Result<bool, ValidationError> {
        Ok(!self.done && self.deadline_at()? <= now)
    }

    pub fn to_display_line(&self) -> String {
        format!(
            "ID: {}, Task: {}, Deadline: {}, Phone: {}",
            self.id, self.description, self.deadline, self.destination
        )
    }
}

//! Reminder scheduler
//!
//! A recurring scan over pending tasks:
//! - snapshot the clock and the pending list
//! - notify every task whose deadline has passed
//! - mark it done whether or not delivery succeeded

mod runner;

pub use runner::{CycleReport, ReminderScheduler, DEFAULT_INTERVAL, DEFAULT_SEND_TIMEOUT};

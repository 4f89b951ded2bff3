//! Donezo library - task reminders with a background notification scheduler

pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod scheduler;
pub mod store;
pub mod task;

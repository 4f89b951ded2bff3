//! CLI command implementations

pub mod add;
pub mod config;
pub mod definition;
pub mod list;
pub mod run;
pub mod shell;

pub use definition::{Cli, Commands};

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::notify::notifier_from_config;
use crate::scheduler::ReminderScheduler;
use crate::store::TaskStore;

/// Loaded configuration plus the opened store, shared by every command.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<TaskStore>,
}

impl AppContext {
    pub fn open(db_override: Option<PathBuf>) -> Result<Self> {
        let config = Config::load()?;
        Self::with_config(config, db_override)
    }

    pub fn with_config(config: Config, db_override: Option<PathBuf>) -> Result<Self> {
        let path = config.store_path(db_override)?;
        let store = TaskStore::open(&path)
            .with_context(|| format!("Failed to open task store at {}", path.display()))?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Scheduler wired to the configured notifier and timings.
    pub fn scheduler(&self) -> Result<ReminderScheduler> {
        let notifier = notifier_from_config(&self.config.notifier)?;
        Ok(ReminderScheduler::new(Arc::clone(&self.store), notifier)
            .with_interval(self.config.scheduler.interval())
            .with_send_timeout(self.config.scheduler.send_timeout()))
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max <= 3 {
        s.chars().take(max).collect()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}

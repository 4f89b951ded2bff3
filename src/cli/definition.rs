//! Top-level clap definitions

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::add::AddArgs;
use super::config::ConfigArgs;
use super::list::ListArgs;
use super::run::RunArgs;

#[derive(Parser)]
#[command(name = "donezo")]
#[command(version, about = "Task reminders that notify you once the deadline passes")]
pub struct Cli {
    /// Task database file (overrides [store] path in config.toml)
    #[arg(long, global = true, env = "DONEZO_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task with a deadline and a phone number to notify
    Add(AddArgs),

    /// List pending tasks
    #[command(alias = "ls")]
    List(ListArgs),

    /// Run the reminder scheduler in the foreground until Ctrl-C
    Run(RunArgs),

    /// Interactive menu with the scheduler running in the background (default)
    Shell,

    /// Show the effective configuration, or write a default config.toml
    Config(ConfigArgs),

    /// Generate shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

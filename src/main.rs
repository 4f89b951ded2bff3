//! Donezo - personal task reminders

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use donezo::cli::{self, AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let default_filter = if std::env::var("DONEZO_DEBUG").is_ok() {
        "donezo=debug"
    } else {
        "donezo=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Completions don't touch the app directory or the database.
    if let Some(Commands::Completion { shell }) = cli.command {
        generate(shell, &mut Cli::command(), "donezo", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(Commands::Config(args)) = cli.command {
        return cli::config::run(args);
    }

    let ctx = AppContext::open(cli.db)?;

    match cli.command {
        Some(Commands::Add(args)) => cli::add::run(&ctx, args).await,
        Some(Commands::List(args)) => cli::list::run(&ctx, args).await,
        Some(Commands::Run(args)) => cli::run::run(&ctx, args).await,
        Some(Commands::Shell) | None => cli::shell::run(&ctx).await,
        Some(Commands::Completion { .. }) | Some(Commands::Config(_)) => unreachable!(),
    }
}

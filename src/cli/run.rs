//! `donezo run` command implementation

use anyhow::Result;
use clap::Args;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::AppContext;

#[derive(Args)]
pub struct RunArgs {
    /// Seconds between scans (overrides [scheduler] interval_secs)
    #[arg(short = 'i', long)]
    interval: Option<u64>,

    /// Run a single scan and exit
    #[arg(long)]
    once: bool,
}

pub async fn run(ctx: &AppContext, args: RunArgs) -> Result<()> {
    let mut scheduler = ctx.scheduler()?;
    if let Some(secs) = args.interval {
        scheduler = scheduler.with_interval(Duration::from_secs(secs.max(1)));
    }

    if args.once {
        let report = scheduler.run_cycle().await?;
        println!(
            "Scan complete: {} sent, {} failed, {} skipped, {} not yet due",
            report.sent.len(),
            report.failed.len(),
            report.skipped.len(),
            report.not_due
        );
        for (id, reason) in &report.failed {
            println!("  ✗ task {}: {}", id, reason);
        }
        for (id, reason) in &report.skipped {
            println!("  ⚠ task {}: {}", id, reason);
        }
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(cancel.clone());

    tokio::signal::ctrl_c().await?;
    info!("interrupt received, shutting down");
    cancel.cancel();
    handle.await?;

    Ok(())
}

//! `donezo add` command implementation

use anyhow::{bail, Result};
use clap::Args;
use std::sync::Arc;

use super::AppContext;
use crate::capture::{CommandCapture, SpeechCapture};
use crate::task::{add_task, NewTask};

#[derive(Args)]
pub struct AddArgs {
    /// What to be reminded of
    #[arg(required_unless_present = "voice")]
    description: Option<String>,

    /// Deadline in local time, "YYYY-MM-DD HH:MM"
    #[arg(short = 'd', long)]
    deadline: String,

    /// Phone number (or other address) to notify
    #[arg(short = 'p', long = "phone")]
    destination: String,

    /// Dictate the description using the [speech] command from config.toml
    #[arg(long, conflicts_with = "description")]
    voice: bool,
}

pub async fn run(ctx: &AppContext, args: AddArgs) -> Result<()> {
    let description = if args.voice {
        let Some(capture) = CommandCapture::from_config(&ctx.config.speech) else {
            bail!("Voice entry needs a [speech] command in config.toml");
        };
        println!("🎤 Say your task...");
        match capture_text(Arc::new(capture)).await? {
            Some(text) => {
                println!("You said: {}", text);
                text
            }
            None => bail!("Could not understand audio"),
        }
    } else {
        args.description.unwrap_or_default()
    };

    let new = NewTask::new(description, args.deadline, args.destination);
    let entry = new.clone();
    let id = ctx.store.call(move |store| add_task(store, &entry)).await?;

    let saved = new.validated()?;
    println!("✅ Task Added: {} at {}", saved.description, saved.deadline);
    println!("  ID:    {}", id);
    println!("  Phone: {}", saved.destination);

    Ok(())
}

/// Recognizers block on the microphone; keep them off the runtime threads.
pub(crate) async fn capture_text(capture: Arc<dyn SpeechCapture>) -> Result<Option<String>> {
    Ok(tokio::task::spawn_blocking(move || capture.capture()).await?)
}

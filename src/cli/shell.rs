//! `donezo shell` - interactive menu
//!
//! The scheduler runs as a background task for as long as the menu is open
//! and is cancelled when the user exits.

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::sync::CancellationToken;

use super::add::capture_text;
use super::AppContext;
use crate::capture::{CommandCapture, SpeechCapture};
use crate::error::TaskError;
use crate::store::TaskStore;
use crate::task::{add_task, format_pending, pending_tasks, NewTask};

const DEADLINE_PROMPT: &str = "Enter deadline (YYYY-MM-DD HH:MM): ";
const PHONE_PROMPT: &str = "Enter verified phone number: ";

pub async fn run(ctx: &AppContext) -> Result<()> {
    let cancel = CancellationToken::new();
    let handle = ctx.scheduler()?.spawn(cancel.clone());

    let capture = CommandCapture::from_config(&ctx.config.speech)
        .map(|c| Arc::new(c) as Arc<dyn SpeechCapture>);
    let input = BufReader::new(tokio::io::stdin());
    let mut shell = Shell::new(Arc::clone(&ctx.store), capture, input);
    let result = shell.run(&mut std::io::stdout()).await;

    cancel.cancel();
    handle.await?;
    result
}

pub struct Shell<R> {
    store: Arc<TaskStore>,
    capture: Option<Arc<dyn SpeechCapture>>,
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Shell<R> {
    pub fn new(store: Arc<TaskStore>, capture: Option<Arc<dyn SpeechCapture>>, input: R) -> Self {
        Self {
            store,
            capture,
            lines: input.lines(),
        }
    }

    /// Menu loop until the user picks exit or input ends.
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        loop {
            writeln!(out, "\n=== ✅ DONEZO To-Do List ===")?;
            writeln!(out, "1. Add Task (Manual)")?;
            writeln!(out, "2. Add Task (Voice)")?;
            writeln!(out, "3. View Tasks")?;
            writeln!(out, "4. Exit")?;

            let Some(choice) = self.prompt(out, "Enter choice: ").await? else {
                break;
            };

            match choice.trim() {
                "1" => self.add_manual(out).await?,
                "2" => self.add_voice(out).await?,
                "3" => {
                    let tasks = self.store.call(|store| pending_tasks(store)).await?;
                    writeln!(out, "\n{}", format_pending(&tasks))?;
                }
                "4" => {
                    writeln!(out, "👋 Exiting Donezo...")?;
                    break;
                }
                _ => writeln!(out, "❌ Invalid choice. Try again.")?,
            }
        }
        Ok(())
    }

    async fn prompt<W: Write>(&mut self, out: &mut W, message: &str) -> Result<Option<String>> {
        write!(out, "{}", message)?;
        out.flush()?;
        Ok(self.lines.next_line().await?)
    }

    async fn add_manual<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let Some(description) = self.prompt(out, "Enter task: ").await? else {
            return Ok(());
        };
        self.finish_add(out, description).await
    }

    async fn add_voice<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let Some(capture) = self.capture.clone() else {
            writeln!(out, "❌ Voice input is not configured (add a [speech] command to config.toml)")?;
            return Ok(());
        };

        writeln!(out, "🎤 Say your task...")?;
        out.flush()?;
        match capture_text(capture).await? {
            Some(text) => {
                writeln!(out, "You said: {}", text)?;
                self.finish_add(out, text).await
            }
            None => {
                writeln!(out, "❌ Could not understand audio")?;
                Ok(())
            }
        }
    }

    async fn finish_add<W: Write>(&mut self, out: &mut W, description: String) -> Result<()> {
        let Some(deadline) = self.prompt(out, DEADLINE_PROMPT).await? else {
            return Ok(());
        };
        let Some(destination) = self.prompt(out, PHONE_PROMPT).await? else {
            return Ok(());
        };

        let new = NewTask::new(description, deadline, destination);
        let entry = new.clone();
        match self.store.call(move |store| add_task(store, &entry)).await {
            Ok(id) => {
                let saved = new.validated()?;
                writeln!(
                    out,
                    "✅ Task Added: {} at {} (ID {})",
                    saved.description, saved.deadline, id
                )?;
            }
            Err(TaskError::Validation(e)) => writeln!(out, "❌ {}", e)?,
            Err(e) => writeln!(out, "❌ Could not save task: {}", e)?,
        }
        Ok(())
    }
}

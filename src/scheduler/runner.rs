//! Scheduler background loop.
//!
//! Spawns a tokio task that periodically scans the store for due tasks and
//! hands them to the notifier. All state lives in the [`TaskStore`]; the
//! scheduler itself only holds handles.

use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{NotifyError, Result};
use crate::notify::Notifier;
use crate::store::TaskStore;
use crate::task::{Task, TaskId};

/// Reference scan period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound on a single gateway call.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one scan cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Delivered and marked done.
    pub sent: Vec<TaskId>,
    /// Delivery (or the done flip) failed. Delivery failures are still marked done.
    pub failed: Vec<(TaskId, String)>,
    /// Unparsable deadline; left pending and retried next cycle.
    pub skipped: Vec<(TaskId, String)>,
    /// Pending tasks whose deadline is still ahead.
    pub not_due: usize,
    /// Shutdown cut the scan short.
    pub interrupted: bool,
}

impl CycleReport {
    /// Tasks that had a notification attempt this cycle.
    pub fn attempted(&self) -> usize {
        self.sent.len() + self.failed.len()
    }

    pub fn is_idle(&self) -> bool {
        self.attempted() == 0 && self.skipped.is_empty()
    }
}

/// Background scheduler that dispatches one reminder per past-due task.
pub struct ReminderScheduler {
    store: Arc<TaskStore>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    send_timeout: Duration,
}

impl ReminderScheduler {
    pub fn new(store: Arc<TaskStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            interval: DEFAULT_INTERVAL,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one scan against the local clock.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        self.run_cycle_at(Local::now().naive_local()).await
    }

    /// Run one scan as if the clock read `now`.
    ///
    /// Only a failure to read the pending list aborts the cycle; everything
    /// after that is isolated per task.
    pub async fn run_cycle_at(&self, now: NaiveDateTime) -> Result<CycleReport> {
        self.run_cycle_until(now, &CancellationToken::new()).await
    }

    /// [`run_cycle_at`](Self::run_cycle_at) that stops early once `cancel`
    /// fires. A send in flight is abandoned and its task still marked done;
    /// tasks not reached stay pending for the next start.
    pub async fn run_cycle_until(
        &self,
        now: NaiveDateTime,
        cancel: &CancellationToken,
    ) -> Result<CycleReport> {
        let pending = self.store.call(|store| store.list_pending()).await?;
        debug!("scan at {}: {} pending task(s)", now, pending.len());

        let mut report = CycleReport::default();
        for task in pending {
            if cancel.is_cancelled() {
                report.interrupted = true;
                break;
            }

            let deadline = match task.deadline_at() {
                Ok(deadline) => deadline,
                Err(e) => {
                    warn!("skipping task {} ('{}'): {}", task.id, task.description, e);
                    report.skipped.push((task.id, e.to_string()));
                    continue;
                }
            };

            if deadline > now {
                report.not_due += 1;
                continue;
            }

            let delivery = tokio::select! {
                result = self.deliver(&task) => result,
                _ = cancel.cancelled() => {
                    report.interrupted = true;
                    Err(NotifyError::Cancelled)
                }
            };

            // Flip done before looking at the delivery result: a failed send
            // is never retried.
            let id = task.id;
            if let Err(e) = self.store.call(move |store| store.mark_done(id)).await {
                error!("task {} notified but could not be marked done: {}", task.id, e);
                report.failed.push((task.id, format!("mark done: {e}")));
                continue;
            }

            match delivery {
                Ok(()) => {
                    info!(
                        "reminder sent via {} to {}: {}",
                        self.notifier.name(),
                        task.destination,
                        task.description
                    );
                    report.sent.push(task.id);
                }
                Err(e) => {
                    warn!(
                        "failed to send reminder for task {} to {}: {}",
                        task.id, task.destination, e
                    );
                    report.failed.push((task.id, e.to_string()));
                }
            }
        }

        if report.interrupted {
            info!("scan stopped early for shutdown");
        }
        Ok(report)
    }

    async fn deliver(&self, task: &Task) -> std::result::Result<(), NotifyError> {
        let send = self.notifier.send(&task.destination, &task.description);
        match tokio::time::timeout(self.send_timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::TimedOut(self.send_timeout)),
        }
    }

    /// Start the periodic loop. The first cycle runs immediately; the loop
    /// ends when `cancel` fires.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "scheduler started (every {:?}, notifier: {})",
                self.interval,
                self.notifier.name()
            );
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let now = Local::now().naive_local();
                match self.run_cycle_until(now, &cancel).await {
                    Ok(report) if !report.is_idle() => debug!(
                        "cycle done: {} sent, {} failed, {} skipped",
                        report.sent.len(),
                        report.failed.len(),
                        report.skipped.len()
                    ),
                    Ok(_) => {}
                    Err(e) => error!("scheduler cycle failed: {}", e),
                }
            }

            info!("scheduler stopped");
        })
    }
}

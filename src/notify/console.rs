use async_trait::async_trait;
use std::io::Write;

use super::Notifier;
use crate::error::NotifyError;

/// Prints reminders to stdout. The default transport when nothing else is configured.
pub struct ConsoleNotifier {
    prefix: String,
}

impl ConsoleNotifier {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn render(&self, destination: &str, body: &str) -> String {
        format!("{}{} -> {}", self.prefix, body, destination)
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, destination: &str, body: &str) -> Result<(), NotifyError> {
        let line = self.render(destination, body);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "\n{line}")
            .and_then(|_| stdout.flush())
            .map_err(|e| NotifyError::Unavailable(format!("stdout: {e}")))
    }
}

//! Notifier gateway
//!
//! The scheduler only sees the [`Notifier`] trait. Transports are built from
//! [`NotifierConfig`] at startup, so credentials never reach scheduling code.

mod console;
mod webhook;

pub use console::ConsoleNotifier;
pub use webhook::WebhookNotifier;

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::config::{NotifierConfig, NotifierKind};
use crate::error::NotifyError;

/// Sends one message body to one destination address.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short transport name for logs.
    fn name(&self) -> &str;

    async fn send(&self, destination: &str, body: &str) -> Result<(), NotifyError>;
}

/// Build the configured transport.
pub fn notifier_from_config(config: &NotifierConfig) -> Result<Arc<dyn Notifier>> {
    match config.kind {
        NotifierKind::Console => Ok(Arc::new(ConsoleNotifier::new(&config.message_prefix))),
        NotifierKind::Webhook => {
            let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) else {
                bail!("notifier.kind = \"webhook\" requires notifier.url in config.toml");
            };
            let notifier = WebhookNotifier::new(url)?
                .with_auth_token(config.auth_token.clone())
                .with_sender(config.sender.clone())
                .with_message_prefix(&config.message_prefix);
            debug!("webhook notifier posting to {}", notifier.url());
            Ok(Arc::new(notifier))
        }
    }
}

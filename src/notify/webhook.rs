//! HTTP webhook transport, e.g. an SMS relay.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::Notifier;
use crate::error::NotifyError;

/// Longest response body kept in a `Rejected` error.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    body: String,
}

/// POSTs `{"to", "from", "body"}` as JSON to a fixed URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    auth_token: Option<String>,
    sender: Option<String>,
    prefix: String,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("donezo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            auth_token: None,
            sender: None,
            prefix: String::new(),
        })
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_sender(mut self, sender: Option<String>) -> Self {
        self.sender = sender.filter(|s| !s.is_empty());
        self
    }

    pub fn with_message_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, destination: &str, body: &str) -> Result<(), NotifyError> {
        let message = OutboundMessage {
            to: destination,
            from: self.sender.as_deref(),
            body: format!("{}{}", self.prefix, body),
        };

        let mut request = self.client.post(&self.url).json(&message);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("webhook accepted message for {}", destination);
        Ok(())
    }
}

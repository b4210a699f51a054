//! Generic HTTP webhook notifier.
//!
//! Delivers the error payload as a JSON POST to a configured URL, for
//! operators who page through something other than SNS.

use async_trait::async_trait;

use crate::traits::{ErrorPayload, Notifier, NotifyError};

/// Delivers payloads as JSON over HTTP to a configured endpoint.
#[derive(Debug)]
pub struct WebhookNotifier {
    url: String,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Result<Self, NotifyError> {
        if url.is_empty() {
            return Err(NotifyError::Config("empty webhook URL".to_string()));
        }
        Ok(Self {
            url,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, payload: &ErrorPayload) -> Result<(), NotifyError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                url = %self.url,
                %status,
                body = %body_text,
                "webhook returned non-2xx status"
            );
            return Err(NotifyError::Config(format!(
                "webhook returned {status}: {body_text}"
            )));
        }

        tracing::debug!(url = %self.url, status = %status, "webhook notification delivered");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}

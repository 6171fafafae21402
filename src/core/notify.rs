use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("webhook endpoint must use HTTPS, got: {0}")]
    InsecureEndpoint(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP client unavailable")]
    ClientUnavailable,
    #[error("webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Best-effort message sink. Implementations never fail the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

#[derive(Serialize)]
struct SlackPayload<'a> {
    text: &'a str,
}

/// Slack incoming-webhook notifier. Disabled when no URL is configured.
pub struct SlackNotifier {
    webhook_url: Option<String>,
    client: Option<reqwest::Client>,
}

impl SlackNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let webhook_url = webhook_url.filter(|url| !url.trim().is_empty());
        let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "Failed to build HTTP client, notifications disabled");
                None
            }
        };
        Self {
            webhook_url,
            client,
        }
    }

    /// Post `message` to the webhook. Returns `Ok(false)` without any request
    /// when no webhook is configured.
    pub async fn dispatch(&self, message: &str) -> Result<bool, NotifyError> {
        let Some(url) = self.webhook_url.as_deref() else {
            return Ok(false);
        };
        if !url.starts_with("https://") {
            return Err(NotifyError::InsecureEndpoint(url.to_string()));
        }
        let client = self.client.as_ref().ok_or(NotifyError::ClientUnavailable)?;

        let response = client
            .post(url)
            .json(&SlackPayload { text: message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(true)
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, message: &str) {
        match self.dispatch(message).await {
            Ok(true) => debug!("Slack notification sent"),
            Ok(false) => info!("Slack webhook URL not configured, skipping notification"),
            Err(e) => warn!(error = %e, "Failed to send Slack notification"),
        }
    }
}

//! New-feedback notifications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MarcoError;

/// Payload of one notification email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Submitter's name
    pub name: String,
    /// Sender address
    pub email: String,
    pub message: String,
    /// Recipient address
    pub to: String,
}

/// Delivers a notification somewhere.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), MarcoError>;
}

/// POSTs the notification as JSON to an email-sending endpoint.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, MarcoError> {
        let client = reqwest::Client::builder()
            .user_agent("marco/0.1")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| MarcoError::Notify(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), MarcoError> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| MarcoError::Notify(format!("Failed to reach {}: {}", self.url, e)))?;
        if !response.status().is_success() {
            return Err(MarcoError::Notify(format!(
                "{} answered HTTP {}",
                self.url,
                response.status()
            )));
        }
        tracing::debug!(to = %notification.to, "notification delivered");
        Ok(())
    }
}

/// Writes the notification to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), MarcoError> {
        tracing::info!(to = %notification.to, from = %notification.email, "{}", notification.message);
        Ok(())
    }
}

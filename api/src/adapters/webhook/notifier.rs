//! Webhook adapter for NotificationClient
//!
//! Posts governance events as JSON to a configured endpoint. Callers treat
//! delivery as best-effort; the adapter reports failures and nothing more.

use async_trait::async_trait;

use crate::domain::ports::{GovernanceEvent, NotificationClient};
use crate::error::NotifyError;

/// Posts events to an HTTP endpoint
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl NotificationClient for WebhookNotifier {
    async fn publish(&self, event: &GovernanceEvent) -> Result<(), NotifyError> {
        let response = self.client.post(&self.endpoint).json(event).send().await?;

        if !response.status().is_success() {
            return Err(NotifyError::Endpoint {
                status: response.status().as_u16(),
            });
        }

        tracing::debug!(
            content_id = %event.content_id,
            event_type = %event.event_type,
            "Published governance event"
        );
        Ok(())
    }
}

/// Discards events. Used when no webhook endpoint is configured.
pub struct NoopNotifier;

#[async_trait]
impl NotificationClient for NoopNotifier {
    async fn publish(&self, event: &GovernanceEvent) -> Result<(), NotifyError> {
        tracing::debug!(
            content_id = %event.content_id,
            event_type = %event.event_type,
            "Notifications disabled, dropping governance event"
        );
        Ok(())
    }
}

/// Runtime-selected notifier so the server can run with or without a
/// configured webhook endpoint.
pub enum Notifier {
    Webhook(WebhookNotifier),
    Noop(NoopNotifier),
}

impl Notifier {
    pub fn from_endpoint(endpoint: Option<String>) -> Self {
        match endpoint {
            Some(endpoint) => Notifier::Webhook(WebhookNotifier::new(endpoint)),
            None => Notifier::Noop(NoopNotifier),
        }
    }
}

#[async_trait]
impl NotificationClient for Notifier {
    async fn publish(&self, event: &GovernanceEvent) -> Result<(), NotifyError> {
        match self {
            Notifier::Webhook(inner) => inner.publish(event).await,
            Notifier::Noop(inner) => inner.publish(event).await,
        }
    }
}

//! Webhook notification adapter

pub mod notifier;

pub use notifier::{NoopNotifier, Notifier, WebhookNotifier};

//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;
pub mod webhook;

pub use postgres::PostgresContentRepository;
pub use webhook::{NoopNotifier, Notifier, WebhookNotifier};

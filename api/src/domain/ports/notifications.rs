//! Notification port
//!
//! Fire-and-forget fan-out of governance decisions to downstream observers
//! (dashboards, creator notifications). Delivery is best-effort: a failed
//! publish never rolls back the decision that triggered it.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::{ActorId, ContentId, ContentStatus};
use crate::error::NotifyError;

/// Kind of governance decision being announced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceEventType {
    Approved,
    Rejected,
    Published,
    RegionRestrictionSet,
}

impl std::fmt::Display for GovernanceEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GovernanceEventType::Approved => write!(f, "approved"),
            GovernanceEventType::Rejected => write!(f, "rejected"),
            GovernanceEventType::Published => write!(f, "published"),
            GovernanceEventType::RegionRestrictionSet => write!(f, "region_restriction_set"),
        }
    }
}

/// Event payload emitted after a successful governance decision
#[derive(Debug, Clone, Serialize)]
pub struct GovernanceEvent {
    pub event_type: GovernanceEventType,
    pub content_id: ContentId,
    pub actor_id: ActorId,
    pub new_status: ContentStatus,
}

/// Downstream observer notification client
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// Publish a governance event. Best-effort only.
    async fn publish(&self, event: &GovernanceEvent) -> Result<(), NotifyError>;
}

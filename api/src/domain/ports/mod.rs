//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod notifications;
pub mod repositories;

pub use notifications::{GovernanceEvent, GovernanceEventType, NotificationClient};
pub use repositories::{ContentQuery, ContentRepository, SortField, SortOrder};

//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod content;

pub use content::{
    ActorId, AgeRating, AuditAction, AuditEntry, ContentAnalytics, ContentId, ContentItem,
    ContentStatus, ContentType, NewContent, RegionRestriction,
};

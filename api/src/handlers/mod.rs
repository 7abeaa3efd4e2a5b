//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod analytics;
pub mod content;

pub use analytics::{content_analytics, governance_stats};
pub use content::{
    approve, archive, check_age, create_content, create_revision, get_content, list_content,
    publish, record_event, reject, restrict_regions, start_review, submit_for_review,
};

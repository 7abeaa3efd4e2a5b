//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use crate::app::AgePolicy;
use crate::domain::entities::{
    ActorId, AgeRating, ContentAnalytics, ContentItem, ContentStatus, ContentType, NewContent,
};

/// Default keyword denylist used by tests (mirrors the config default)
pub fn test_age_policy() -> AgePolicy {
    AgePolicy::new(vec![
        "violence".to_string(),
        "explicit".to_string(),
        "adult".to_string(),
    ])
}

/// Intake payload with sensible defaults
pub fn test_new_content() -> NewContent {
    NewContent {
        title: "Fractions 101".to_string(),
        description: Some("An introduction to fractions".to_string()),
        body: serde_json::json!({ "sections": ["numerators", "denominators"] }),
        tags: vec!["math".to_string()],
        keywords: vec!["fractions".to_string()],
        content_type: ContentType::Lesson,
        category: "mathematics".to_string(),
        age_rating: AgeRating::SevenPlus,
        min_age: None,
        max_age: None,
        organization_id: None,
    }
}

/// Create a draft content item with default values
pub fn test_content() -> ContentItem {
    ContentItem::new_draft(test_new_content(), ActorId::new())
}

/// Create a content item in a specific governance state.
/// Review metadata is filled in to keep the record plausible.
pub fn test_content_with_status(status: ContentStatus) -> ContentItem {
    let mut item = test_content();
    let actor = ActorId::new();
    let now = chrono::Utc::now();

    match status {
        ContentStatus::Draft => {}
        ContentStatus::Pending => {
            item.submitted_for_review = Some(now);
        }
        ContentStatus::UnderReview => {
            item.submitted_for_review = Some(now);
            item.reviewed_by = Some(actor);
            item.reviewed_at = Some(now);
        }
        ContentStatus::Approved | ContentStatus::Published => {
            item.submitted_for_review = Some(now);
            item.approved_by = Some(actor);
            item.approved_at = Some(now);
        }
        ContentStatus::Rejected => {
            item.submitted_for_review = Some(now);
            item.rejected_by = Some(actor);
            item.rejected_at = Some(now);
            item.rejection_reason = Some("Needs revision".to_string());
        }
        ContentStatus::Archived => {}
    }

    item.status = status;
    item
}

/// Create a published content item with the given usage counters
pub fn test_content_with_analytics(
    views: i64,
    completions: i64,
    shares: i64,
    average_rating: f64,
) -> ContentItem {
    let mut item = test_content_with_status(ContentStatus::Published);
    item.analytics = ContentAnalytics {
        views,
        completions,
        shares,
        average_rating,
        rating_count: if average_rating > 0.0 { 1 } else { 0 },
        ..Default::default()
    };
    item
}

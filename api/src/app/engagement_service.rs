//! Engagement service
//!
//! Applies usage events (views, completions, downloads, shares, ratings) to
//! a content item's counters and refreshes the cached engagement score.
//! The cached score is invalidated on every counter change and is never
//! authoritative - reporting recomputes it from the counters.
//!
//! Tracking is not a governance decision: no audit entry is appended and no
//! notification is emitted.

use std::sync::Arc;

use chrono::Utc;

use crate::app::scoring::score_engagement;
use crate::domain::entities::{ContentId, ContentItem};
use crate::domain::ports::ContentRepository;
use crate::error::{AppError, DomainError};

/// One usage signal from the delivery platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngagementEvent {
    View,
    Completion,
    Download,
    Share,
    /// A 1-5 star rating folded into the running average
    Rating(u8),
}

/// Service applying engagement events to content records
pub struct EngagementService<CR>
where
    CR: ContentRepository,
{
    contents: Arc<CR>,
}

impl<CR> EngagementService<CR>
where
    CR: ContentRepository,
{
    pub fn new(contents: Arc<CR>) -> Self {
        Self { contents }
    }

    /// Apply one event and refresh the cached score
    pub async fn record(
        &self,
        id: &ContentId,
        event: EngagementEvent,
    ) -> Result<ContentItem, AppError> {
        if let EngagementEvent::Rating(stars) = event {
            if !(1..=5).contains(&stars) {
                return Err(DomainError::Validation(format!(
                    "Rating must be between 1 and 5, got {}",
                    stars
                ))
                .into());
            }
        }

        let mut item = self
            .contents
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Content {} not found", id)))?;

        match event {
            EngagementEvent::View => item.analytics.views += 1,
            EngagementEvent::Completion => item.analytics.completions += 1,
            EngagementEvent::Download => item.analytics.downloads += 1,
            EngagementEvent::Share => item.analytics.shares += 1,
            EngagementEvent::Rating(stars) => {
                let count = item.analytics.rating_count as f64;
                let total = item.analytics.average_rating * count + stars as f64;
                item.analytics.rating_count += 1;
                item.analytics.average_rating = total / (count + 1.0);
            }
        }

        // Counters changed: the cached derived fields are stale
        let metrics = score_engagement(&item.analytics);
        item.analytics.engagement_score = metrics.engagement_score;
        item.analytics.completion_rate = metrics.completion_rate;
        item.updated_at = Utc::now();

        Ok(self.contents.save(&item).await?)
    }
}

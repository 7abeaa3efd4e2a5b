//! Mock implementations of port traits
//!
//! In-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::entities::{ContentId, ContentItem, ContentStatus, ContentType};
use crate::domain::ports::{
    ContentQuery, ContentRepository, GovernanceEvent, NotificationClient, SortField, SortOrder,
};
use crate::error::{DomainError, NotifyError};

// ============================================================================
// In-Memory Content Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryContentRepository {
    items: Arc<RwLock<HashMap<ContentId, ContentItem>>>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a content item for testing
    pub fn with_content(self, item: ContentItem) -> Self {
        {
            let mut items = self.items.write().unwrap();
            items.insert(item.id, item);
        }
        self
    }
}

fn matches_search(item: &ContentItem, term: &str) -> bool {
    let term = term.to_lowercase();
    item.title.to_lowercase().contains(&term)
        || item
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&term))
        || item.tags.iter().any(|t| t.to_lowercase().contains(&term))
        || item
            .keywords
            .iter()
            .any(|k| k.to_lowercase().contains(&term))
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn find_by_id(&self, id: &ContentId) -> Result<Option<ContentItem>, DomainError> {
        let items = self.items.read().unwrap();
        Ok(items.get(id).cloned())
    }

    async fn insert(&self, item: &ContentItem) -> Result<ContentItem, DomainError> {
        let mut items = self.items.write().unwrap();
        if items.contains_key(&item.id) {
            return Err(DomainError::Conflict(format!(
                "Content {} already exists",
                item.id
            )));
        }
        items.insert(item.id, item.clone());
        Ok(item.clone())
    }

    async fn save(&self, item: &ContentItem) -> Result<ContentItem, DomainError> {
        let mut items = self.items.write().unwrap();
        if !items.contains_key(&item.id) {
            return Err(DomainError::NotFound(format!(
                "Content {} not found",
                item.id
            )));
        }
        items.insert(item.id, item.clone());
        Ok(item.clone())
    }

    async fn search(&self, query: &ContentQuery) -> Result<(Vec<ContentItem>, u64), DomainError> {
        let items = self.items.read().unwrap();

        let mut matches: Vec<ContentItem> = items
            .values()
            .filter(|i| query.status.map_or(true, |s| i.status == s))
            .filter(|i| query.content_type.map_or(true, |t| i.content_type == t))
            .filter(|i| {
                query
                    .category
                    .as_deref()
                    .map_or(true, |c| i.category == c)
            })
            .filter(|i| query.age_rating.map_or(true, |r| i.age_rating == r))
            .filter(|i| {
                query
                    .search
                    .as_deref()
                    .map_or(true, |term| matches_search(i, term))
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortField::Title => a.title.cmp(&b.title),
                SortField::EngagementScore => a
                    .analytics
                    .engagement_score
                    .cmp(&b.analytics.engagement_score),
                SortField::Views => a.analytics.views.cmp(&b.analytics.views),
            };
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matches.len() as u64;
        let start = (query.page.saturating_sub(1) * query.limit) as usize;
        let page: Vec<ContentItem> = matches
            .into_iter()
            .skip(start)
            .take(query.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_for_analytics(
        &self,
        since: DateTime<Utc>,
        content_type: Option<ContentType>,
        category: Option<&str>,
    ) -> Result<Vec<ContentItem>, DomainError> {
        let items = self.items.read().unwrap();
        Ok(items
            .values()
            .filter(|i| {
                matches!(
                    i.status,
                    ContentStatus::Approved | ContentStatus::Published
                )
            })
            .filter(|i| i.created_at >= since)
            .filter(|i| content_type.map_or(true, |t| i.content_type == t))
            .filter(|i| category.map_or(true, |c| i.category == c))
            .cloned()
            .collect())
    }

    async fn find_by_organization(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<ContentItem>, DomainError> {
        let items = self.items.read().unwrap();
        Ok(items
            .values()
            .filter(|i| organization_id.map_or(true, |org| i.organization_id == Some(org)))
            .cloned()
            .collect())
    }
}

// ============================================================================
// Recording Notification Client
// ============================================================================

/// Records published events; can be configured to fail every publish to
/// verify that governance decisions survive notification outages.
pub struct RecordingNotifier {
    events: Arc<RwLock<Vec<GovernanceEvent>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<GovernanceEvent> {
        self.events.read().unwrap().clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationClient for RecordingNotifier {
    async fn publish(&self, event: &GovernanceEvent) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Endpoint { status: 503 });
        }
        self.events.write().unwrap().push(event.clone());
        Ok(())
    }
}

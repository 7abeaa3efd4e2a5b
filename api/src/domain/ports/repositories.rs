//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{AgeRating, ContentId, ContentItem, ContentStatus, ContentType};
use crate::error::DomainError;

/// Sortable fields for content listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    EngagementScore,
    Views,
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            "engagement_score" => Ok(SortField::EngagementScore),
            "views" => Ok(SortField::Views),
            _ => Err(format!("Unknown sort field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Filter, search, and paging parameters for content listings.
/// `page` is 1-based.
#[derive(Debug, Clone)]
pub struct ContentQuery {
    pub status: Option<ContentStatus>,
    pub content_type: Option<ContentType>,
    pub category: Option<String>,
    pub age_rating: Option<AgeRating>,
    /// Case-insensitive match against title, description, tags, and keywords
    pub search: Option<String>,
    pub page: u64,
    pub limit: u64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ContentQuery {
    fn default() -> Self {
        Self {
            status: None,
            content_type: None,
            category: None,
            age_rating: None,
            search: None,
            page: 1,
            limit: 20,
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

/// Repository for ContentItem records
///
/// `save` is assumed atomic for a single record: concurrent readers never
/// observe a partial write. The engine performs no retries on failure.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Find a content item by ID
    async fn find_by_id(&self, id: &ContentId) -> Result<Option<ContentItem>, DomainError>;

    /// Persist a new content item
    async fn insert(&self, item: &ContentItem) -> Result<ContentItem, DomainError>;

    /// Persist the full current state of an existing item
    async fn save(&self, item: &ContentItem) -> Result<ContentItem, DomainError>;

    /// Filtered, sorted, paginated listing. Returns the page of items plus
    /// the total number of matches.
    async fn search(&self, query: &ContentQuery) -> Result<(Vec<ContentItem>, u64), DomainError>;

    /// Fold input for the analytics report: approved or published items
    /// created since the given bound, optionally narrowed by type/category.
    async fn find_for_analytics(
        &self,
        since: DateTime<Utc>,
        content_type: Option<ContentType>,
        category: Option<&str>,
    ) -> Result<Vec<ContentItem>, DomainError>;

    /// Fold input for governance statistics: all items, optionally narrowed
    /// to one organization.
    async fn find_by_organization(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<ContentItem>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_from_str() {
        assert_eq!(
            "created_at".parse::<SortField>().unwrap(),
            SortField::CreatedAt
        );
        assert_eq!(
            "engagement_score".parse::<SortField>().unwrap(),
            SortField::EngagementScore
        );
        assert!("elo".parse::<SortField>().is_err());
    }

    #[test]
    fn sort_order_from_str() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn default_query_is_first_page_newest_first() {
        let query = ContentQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 20);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert!(query.status.is_none());
    }
}

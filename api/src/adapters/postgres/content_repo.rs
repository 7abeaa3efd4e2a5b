//! PostgreSQL adapter for ContentRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    ActorId, ContentAnalytics, ContentId, ContentItem, ContentStatus, ContentType,
};
use crate::domain::ports::{ContentQuery, ContentRepository, SortField, SortOrder};
use crate::entity::contents;
use crate::error::DomainError;

/// PostgreSQL implementation of ContentRepository
pub struct PostgresContentRepository {
    db: DatabaseConnection,
}

impl PostgresContentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn find_by_id(&self, id: &ContentId) -> Result<Option<ContentItem>, DomainError> {
        let result = contents::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(into_domain).transpose()
    }

    async fn insert(&self, item: &ContentItem) -> Result<ContentItem, DomainError> {
        let model = into_active_model(item)?;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        into_domain(result)
    }

    async fn save(&self, item: &ContentItem) -> Result<ContentItem, DomainError> {
        let model = into_active_model(item)?;

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        into_domain(result)
    }

    async fn search(&self, query: &ContentQuery) -> Result<(Vec<ContentItem>, u64), DomainError> {
        let mut select = contents::Entity::find();

        if let Some(status) = query.status {
            select = select.filter(contents::Column::Status.eq(status.to_string()));
        }
        if let Some(content_type) = query.content_type {
            select = select.filter(contents::Column::ContentType.eq(content_type.to_string()));
        }
        if let Some(category) = &query.category {
            select = select.filter(contents::Column::Category.eq(category.as_str()));
        }
        if let Some(age_rating) = query.age_rating {
            select = select.filter(contents::Column::AgeRating.eq(age_rating.to_string()));
        }
        if let Some(search) = &query.search {
            let term = format!("%{}%", search.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(contents::Column::Title)))
                            .like(term.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(contents::Column::Description)))
                            .like(term.clone()),
                    )
                    .add(Expr::cust_with_values(
                        "LOWER(tags::text) LIKE ?",
                        [term.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "LOWER(keywords::text) LIKE ?",
                        [term],
                    )),
            );
        }

        let column = match query.sort_by {
            SortField::CreatedAt => contents::Column::CreatedAt,
            SortField::UpdatedAt => contents::Column::UpdatedAt,
            SortField::Title => contents::Column::Title,
            SortField::EngagementScore => contents::Column::EngagementScore,
            SortField::Views => contents::Column::Views,
        };
        select = match query.sort_order {
            SortOrder::Asc => select.order_by_asc(column),
            SortOrder::Desc => select.order_by_desc(column),
        };

        let paginator = select.paginate(&self.db, query.limit.max(1));
        let total = paginator
            .num_items()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let page = paginator
            .fetch_page(query.page.saturating_sub(1))
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let items = page
            .into_iter()
            .map(into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((items, total))
    }

    async fn find_for_analytics(
        &self,
        since: DateTime<Utc>,
        content_type: Option<ContentType>,
        category: Option<&str>,
    ) -> Result<Vec<ContentItem>, DomainError> {
        let mut select = contents::Entity::find()
            .filter(contents::Column::Status.is_in([
                ContentStatus::Approved.to_string(),
                ContentStatus::Published.to_string(),
            ]))
            .filter(contents::Column::CreatedAt.gte(since.fixed_offset()));

        if let Some(content_type) = content_type {
            select = select.filter(contents::Column::ContentType.eq(content_type.to_string()));
        }
        if let Some(category) = category {
            select = select.filter(contents::Column::Category.eq(category));
        }

        let results = select
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(into_domain).collect()
    }

    async fn find_by_organization(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<ContentItem>, DomainError> {
        let mut select = contents::Entity::find();
        if let Some(org) = organization_id {
            select = select.filter(contents::Column::OrganizationId.eq(org));
        }

        let results = select
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(into_domain).collect()
    }
}

fn into_domain(model: contents::Model) -> Result<ContentItem, DomainError> {
    let parse = |field: &str, e: String| {
        DomainError::Internal(format!("Corrupt {} on content {}: {}", field, model.id, e))
    };

    Ok(ContentItem {
        id: ContentId(model.id),
        title: model.title.clone(),
        description: model.description.clone(),
        body: model.body.clone(),
        tags: serde_json::from_value(model.tags.clone()).map_err(|e| parse("tags", e.to_string()))?,
        keywords: serde_json::from_value(model.keywords.clone())
            .map_err(|e| parse("keywords", e.to_string()))?,
        content_type: model
            .content_type
            .parse()
            .map_err(|e| parse("content_type", e))?,
        category: model.category.clone(),
        age_rating: model.age_rating.parse().map_err(|e| parse("age_rating", e))?,
        min_age: model.min_age.map(|a| a as u8),
        max_age: model.max_age.map(|a| a as u8),
        status: model.status.parse().map_err(|e| parse("status", e))?,
        created_by: ActorId(model.created_by),
        organization_id: model.organization_id,
        submitted_for_review: model.submitted_for_review.map(|t| t.to_utc()),
        reviewed_by: model.reviewed_by.map(ActorId),
        reviewed_at: model.reviewed_at.map(|t| t.to_utc()),
        approved_by: model.approved_by.map(ActorId),
        approved_at: model.approved_at.map(|t| t.to_utc()),
        rejected_by: model.rejected_by.map(ActorId),
        rejected_at: model.rejected_at.map(|t| t.to_utc()),
        rejection_reason: model.rejection_reason.clone(),
        allowed_regions: serde_json::from_value(model.allowed_regions.clone())
            .map_err(|e| parse("allowed_regions", e.to_string()))?,
        blocked_regions: serde_json::from_value(model.blocked_regions.clone())
            .map_err(|e| parse("blocked_regions", e.to_string()))?,
        region_restrictions: serde_json::from_value(model.region_restrictions.clone())
            .map_err(|e| parse("region_restrictions", e.to_string()))?,
        analytics: ContentAnalytics {
            views: model.views,
            completions: model.completions,
            downloads: model.downloads,
            shares: model.shares,
            average_rating: model.average_rating,
            rating_count: model.rating_count,
            engagement_score: model.engagement_score,
            completion_rate: model.completion_rate,
        },
        version: model.version,
        parent_version: model.parent_version.map(ContentId),
        is_latest_version: model.is_latest_version,
        audit_trail: serde_json::from_value(model.audit_trail.clone())
            .map_err(|e| parse("audit_trail", e.to_string()))?,
        created_at: model.created_at.to_utc(),
        updated_at: model.updated_at.to_utc(),
    })
}

fn into_active_model(item: &ContentItem) -> Result<contents::ActiveModel, DomainError> {
    let json = |field: &str, value: Result<serde_json::Value, serde_json::Error>| {
        value.map_err(|e| {
            DomainError::Internal(format!("Cannot serialize {} on content {}: {}", field, item.id, e))
        })
    };

    Ok(contents::ActiveModel {
        id: Set(item.id.0),
        title: Set(item.title.clone()),
        description: Set(item.description.clone()),
        body: Set(item.body.clone()),
        tags: Set(json("tags", serde_json::to_value(&item.tags))?),
        keywords: Set(json("keywords", serde_json::to_value(&item.keywords))?),
        content_type: Set(item.content_type.to_string()),
        category: Set(item.category.clone()),
        age_rating: Set(item.age_rating.to_string()),
        min_age: Set(item.min_age.map(i32::from)),
        max_age: Set(item.max_age.map(i32::from)),
        status: Set(item.status.to_string()),
        created_by: Set(item.created_by.0),
        organization_id: Set(item.organization_id),
        submitted_for_review: Set(item.submitted_for_review.map(|t| t.fixed_offset())),
        reviewed_by: Set(item.reviewed_by.map(|a| a.0)),
        reviewed_at: Set(item.reviewed_at.map(|t| t.fixed_offset())),
        approved_by: Set(item.approved_by.map(|a| a.0)),
        approved_at: Set(item.approved_at.map(|t| t.fixed_offset())),
        rejected_by: Set(item.rejected_by.map(|a| a.0)),
        rejected_at: Set(item.rejected_at.map(|t| t.fixed_offset())),
        rejection_reason: Set(item.rejection_reason.clone()),
        allowed_regions: Set(json(
            "allowed_regions",
            serde_json::to_value(&item.allowed_regions),
        )?),
        blocked_regions: Set(json(
            "blocked_regions",
            serde_json::to_value(&item.blocked_regions),
        )?),
        region_restrictions: Set(json(
            "region_restrictions",
            serde_json::to_value(&item.region_restrictions),
        )?),
        views: Set(item.analytics.views),
        completions: Set(item.analytics.completions),
        downloads: Set(item.analytics.downloads),
        shares: Set(item.analytics.shares),
        average_rating: Set(item.analytics.average_rating),
        rating_count: Set(item.analytics.rating_count),
        engagement_score: Set(item.analytics.engagement_score),
        completion_rate: Set(item.analytics.completion_rate),
        version: Set(item.version),
        parent_version: Set(item.parent_version.map(|p| p.0)),
        is_latest_version: Set(item.is_latest_version),
        audit_trail: Set(json("audit_trail", serde_json::to_value(&item.audit_trail))?),
        created_at: Set(item.created_at.fixed_offset()),
        updated_at: Set(item.updated_at.fixed_offset()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AuditAction, AuditEntry};
    use crate::test_utils::test_content;
    use sea_orm::TryIntoModel;

    fn round_trip_model(item: &ContentItem) -> contents::Model {
        into_active_model(item)
            .unwrap()
            .try_into_model()
            .unwrap()
    }

    #[test]
    fn domain_round_trips_through_the_row_model() {
        let mut item = test_content();
        item.audit_trail.push(AuditEntry {
            action: AuditAction::Approved,
            performed_by: ActorId::new(),
            performed_at: Utc::now(),
            changes: serde_json::json!({ "status": "approved" }),
            reason: Some("fine".to_string()),
        });
        item.blocked_regions = vec!["IN".to_string()];
        item.min_age = Some(8);

        let back = into_domain(round_trip_model(&item)).unwrap();

        assert_eq!(back.id, item.id);
        assert_eq!(back.status, item.status);
        assert_eq!(back.content_type, item.content_type);
        assert_eq!(back.age_rating, item.age_rating);
        assert_eq!(back.min_age, item.min_age);
        assert_eq!(back.blocked_regions, item.blocked_regions);
        assert_eq!(back.audit_trail.len(), item.audit_trail.len());
        assert_eq!(back.audit_trail.last(), item.audit_trail.last());
        assert_eq!(back.analytics, item.analytics);
    }

    #[test]
    fn corrupt_status_surfaces_as_internal_error() {
        let mut model = round_trip_model(&test_content());
        model.status = "mangled".to_string();

        assert!(matches!(into_domain(model), Err(DomainError::Internal(_))));
    }

    #[test]
    fn corrupt_audit_trail_surfaces_as_internal_error() {
        let mut model = round_trip_model(&test_content());
        model.audit_trail = serde_json::json!({ "not": "a list" });

        assert!(matches!(into_domain(model), Err(DomainError::Internal(_))));
    }
}

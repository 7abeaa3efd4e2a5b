//! Governance service
//!
//! The workflow controller for the content lifecycle. Every operation is
//! check-then-act: transition legality and input validation run before any
//! field is touched, so a failed call leaves the stored record unchanged.
//! Each successful transition appends exactly one audit entry in the same
//! save that changes the status.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::app::age_policy::{AgeCheck, AgeIssue, AgePolicy};
use crate::app::region_policy::{evaluate_region, RegionAccess};
use crate::app::scoring::{score_engagement, PerformanceMetrics};
use crate::domain::entities::{
    ActorId, AgeRating, AuditAction, ContentId, ContentItem, ContentStatus, NewContent,
    RegionRestriction,
};
use crate::domain::ports::{
    ContentQuery, ContentRepository, GovernanceEvent, GovernanceEventType, NotificationClient,
};
use crate::error::{AppError, DomainError};

/// Wholesale replacement payload for the region enforcement lists
#[derive(Debug, Clone, Default)]
pub struct RegionRestrictionUpdate {
    pub allowed_regions: Option<Vec<String>>,
    pub blocked_regions: Option<Vec<String>>,
    pub reason: Option<String>,
}

/// A content record enriched with computed performance metrics and,
/// when a requester region is known, a region-access verdict
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedContent {
    #[serde(flatten)]
    pub content: ContentItem,
    pub performance: PerformanceMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_access: Option<RegionAccess>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

/// One page of enriched content records
#[derive(Debug, Clone, Serialize)]
pub struct ContentPage {
    pub content: Vec<EnrichedContent>,
    pub pagination: Pagination,
}

/// Age-check verdict envelope returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct AgeCheckReport {
    pub content_id: ContentId,
    pub title: String,
    pub age_rating: AgeRating,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub requester_age: u8,
    pub is_appropriate: bool,
    pub issues: Vec<AgeIssue>,
}

/// Service orchestrating the governance lifecycle
pub struct GovernanceService<CR, NC>
where
    CR: ContentRepository,
    NC: NotificationClient,
{
    contents: Arc<CR>,
    notifier: Arc<NC>,
    age_policy: AgePolicy,
}

impl<CR, NC> GovernanceService<CR, NC>
where
    CR: ContentRepository,
    NC: NotificationClient,
{
    pub fn new(contents: Arc<CR>, notifier: Arc<NC>, age_policy: AgePolicy) -> Self {
        Self {
            contents,
            notifier,
            age_policy,
        }
    }

    /// Author intake: a new record enters the store as a draft
    pub async fn create_content(
        &self,
        new: NewContent,
        actor: ActorId,
    ) -> Result<EnrichedContent, AppError> {
        if new.title.trim().is_empty() {
            return Err(DomainError::Validation("Title must not be empty".to_string()).into());
        }
        if let (Some(min), Some(max)) = (new.min_age, new.max_age) {
            if min > max {
                return Err(DomainError::Validation(
                    "min_age must not exceed max_age".to_string(),
                )
                .into());
            }
        }

        let item = ContentItem::new_draft(new, actor);
        let saved = self.contents.insert(&item).await?;
        Ok(enrich(saved, None))
    }

    /// Submit a draft for review. Also the explicit resubmission edge:
    /// rejected content may re-enter `pending` after revision.
    pub async fn submit_for_review(
        &self,
        id: &ContentId,
        actor: ActorId,
    ) -> Result<EnrichedContent, AppError> {
        let mut item = self.load(id).await?;
        ensure_transition(&item, "submit", item.status.is_submittable())?;

        let now = Utc::now();
        item.status = ContentStatus::Pending;
        item.submitted_for_review = Some(now);
        // A resubmission sheds the prior rejection verdict; the audit trail
        // keeps the history.
        item.rejected_by = None;
        item.rejected_at = None;
        item.rejection_reason = None;
        item.updated_at = now;
        item.audit(
            AuditAction::SubmittedForReview,
            actor,
            serde_json::json!({ "status": ContentStatus::Pending }),
            None,
        );

        let saved = self.contents.save(&item).await?;
        Ok(enrich(saved, None))
    }

    /// A reviewer picks the item up: `pending` -> `under_review`
    pub async fn start_review(
        &self,
        id: &ContentId,
        reviewer: ActorId,
    ) -> Result<EnrichedContent, AppError> {
        let mut item = self.load(id).await?;
        ensure_transition(
            &item,
            "start review on",
            item.status == ContentStatus::Pending,
        )?;

        let now = Utc::now();
        item.status = ContentStatus::UnderReview;
        item.reviewed_by = Some(reviewer);
        item.reviewed_at = Some(now);
        item.updated_at = now;
        item.audit(
            AuditAction::ReviewStarted,
            reviewer,
            serde_json::json!({ "status": ContentStatus::UnderReview }),
            None,
        );

        let saved = self.contents.save(&item).await?;
        Ok(enrich(saved, None))
    }

    /// Approve content under review
    pub async fn approve(
        &self,
        id: &ContentId,
        reviewer: ActorId,
        comments: Option<String>,
    ) -> Result<EnrichedContent, AppError> {
        let mut item = self.load(id).await?;
        ensure_transition(&item, "approve", item.status.is_reviewable())?;

        let now = Utc::now();
        item.status = ContentStatus::Approved;
        item.approved_by = Some(reviewer);
        item.approved_at = Some(now);
        item.updated_at = now;
        item.audit(
            AuditAction::Approved,
            reviewer,
            serde_json::json!({ "status": ContentStatus::Approved }),
            comments,
        );

        let saved = self.contents.save(&item).await?;
        self.notify(GovernanceEvent {
            event_type: GovernanceEventType::Approved,
            content_id: saved.id,
            actor_id: reviewer,
            new_status: saved.status,
        })
        .await;
        Ok(enrich(saved, None))
    }

    /// Reject content under review. The reason is mandatory and checked
    /// before anything is mutated.
    pub async fn reject(
        &self,
        id: &ContentId,
        reviewer: ActorId,
        rejection_reason: &str,
    ) -> Result<EnrichedContent, AppError> {
        let mut item = self.load(id).await?;
        if rejection_reason.trim().is_empty() {
            return Err(DomainError::MissingReason.into());
        }
        ensure_transition(&item, "reject", item.status.is_reviewable())?;

        let now = Utc::now();
        item.status = ContentStatus::Rejected;
        item.rejected_by = Some(reviewer);
        item.rejected_at = Some(now);
        item.rejection_reason = Some(rejection_reason.to_string());
        item.updated_at = now;
        item.audit(
            AuditAction::Rejected,
            reviewer,
            serde_json::json!({ "status": ContentStatus::Rejected }),
            Some(rejection_reason.to_string()),
        );

        let saved = self.contents.save(&item).await?;
        self.notify(GovernanceEvent {
            event_type: GovernanceEventType::Rejected,
            content_id: saved.id,
            actor_id: reviewer,
            new_status: saved.status,
        })
        .await;
        Ok(enrich(saved, None))
    }

    /// Publish approved content
    pub async fn publish(
        &self,
        id: &ContentId,
        actor: ActorId,
    ) -> Result<EnrichedContent, AppError> {
        let mut item = self.load(id).await?;
        ensure_transition(&item, "publish", item.status == ContentStatus::Approved)?;

        let now = Utc::now();
        item.status = ContentStatus::Published;
        item.updated_at = now;
        item.audit(
            AuditAction::Published,
            actor,
            serde_json::json!({ "status": ContentStatus::Published }),
            None,
        );

        let saved = self.contents.save(&item).await?;
        self.notify(GovernanceEvent {
            event_type: GovernanceEventType::Published,
            content_id: saved.id,
            actor_id: actor,
            new_status: saved.status,
        })
        .await;
        Ok(enrich(saved, None))
    }

    /// Archive content from any non-terminal state
    pub async fn archive(
        &self,
        id: &ContentId,
        actor: ActorId,
    ) -> Result<EnrichedContent, AppError> {
        let mut item = self.load(id).await?;
        ensure_transition(&item, "archive", item.status.is_archivable())?;

        let now = Utc::now();
        item.status = ContentStatus::Archived;
        item.updated_at = now;
        item.audit(
            AuditAction::Archived,
            actor,
            serde_json::json!({ "status": ContentStatus::Archived }),
            None,
        );

        let saved = self.contents.save(&item).await?;
        Ok(enrich(saved, None))
    }

    /// Replace the region enforcement lists wholesale. Each newly blocked
    /// region that has no restriction record yet gets one with the actor
    /// and timestamp; one audit entry summarizes the whole change.
    pub async fn restrict_regions(
        &self,
        id: &ContentId,
        update: RegionRestrictionUpdate,
        actor: ActorId,
    ) -> Result<EnrichedContent, AppError> {
        let mut item = self.load(id).await?;
        ensure_transition(
            &item,
            "restrict regions on",
            item.status != ContentStatus::Archived,
        )?;

        let now = Utc::now();
        let allowed = update.allowed_regions.unwrap_or_default();
        let blocked = update.blocked_regions.unwrap_or_default();

        for region in &blocked {
            if !item.region_restrictions.iter().any(|r| &r.region == region) {
                item.region_restrictions.push(RegionRestriction {
                    region: region.clone(),
                    reason: update
                        .reason
                        .clone()
                        .unwrap_or_else(|| "Content restriction".to_string()),
                    blocked_by: actor,
                    blocked_at: now,
                });
            }
        }

        item.allowed_regions = allowed.clone();
        item.blocked_regions = blocked.clone();
        item.updated_at = now;
        item.audit(
            AuditAction::RegionRestrictionSet,
            actor,
            serde_json::json!({
                "allowed_regions": allowed,
                "blocked_regions": blocked,
            }),
            update.reason,
        );

        let saved = self.contents.save(&item).await?;
        self.notify(GovernanceEvent {
            event_type: GovernanceEventType::RegionRestrictionSet,
            content_id: saved.id,
            actor_id: actor,
            new_status: saved.status,
        })
        .await;
        Ok(enrich(saved, None))
    }

    /// Derive a new draft revision from the latest version of a lineage.
    /// The parent's `is_latest_version` flag moves to the new record.
    pub async fn create_revision(
        &self,
        id: &ContentId,
        actor: ActorId,
    ) -> Result<EnrichedContent, AppError> {
        let mut parent = self.load(id).await?;
        if !parent.is_latest_version {
            return Err(DomainError::Conflict(format!(
                "Content {} is not the latest version of its lineage",
                parent.id
            ))
            .into());
        }

        let revision = parent.next_revision(actor);
        let saved = self.contents.insert(&revision).await?;

        parent.is_latest_version = false;
        parent.updated_at = Utc::now();
        self.contents.save(&parent).await?;

        Ok(enrich(saved, None))
    }

    /// Run the age-appropriateness evaluator for a requester age.
    /// Read-only: reports, never enforces.
    pub async fn check_age(
        &self,
        id: &ContentId,
        requester_age: u8,
    ) -> Result<AgeCheckReport, AppError> {
        let item = self.load(id).await?;
        let AgeCheck {
            is_appropriate,
            issues,
        } = self.age_policy.evaluate(&item, requester_age);

        Ok(AgeCheckReport {
            content_id: item.id,
            title: item.title,
            age_rating: item.age_rating,
            min_age: item.min_age,
            max_age: item.max_age,
            requester_age,
            is_appropriate,
            issues,
        })
    }

    /// Filtered, paginated listing, each record enriched with freshly
    /// computed performance metrics and, when a requester region is given,
    /// a region-access verdict.
    pub async fn get_content(
        &self,
        query: &ContentQuery,
        requester_region: Option<&str>,
    ) -> Result<ContentPage, AppError> {
        let (items, total) = self.contents.search(query).await?;

        let content = items
            .into_iter()
            .map(|item| enrich(item, requester_region))
            .collect();

        let pages = if query.limit > 0 {
            total.div_ceil(query.limit)
        } else {
            0
        };

        Ok(ContentPage {
            content,
            pagination: Pagination {
                total,
                page: query.page,
                limit: query.limit,
                pages,
            },
        })
    }

    /// Single enriched record
    pub async fn get_content_by_id(&self, id: &ContentId) -> Result<EnrichedContent, AppError> {
        let item = self.load(id).await?;
        Ok(enrich(item, None))
    }

    async fn load(&self, id: &ContentId) -> Result<ContentItem, DomainError> {
        self.contents
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Content {} not found", id)))
    }

    /// Best-effort event fan-out. A failed publish is logged and swallowed;
    /// it never rolls back the decision that triggered it.
    async fn notify(&self, event: GovernanceEvent) {
        if let Err(e) = self.notifier.publish(&event).await {
            tracing::warn!(
                error = %e,
                content_id = %event.content_id,
                event_type = %event.event_type,
                "Failed to publish governance event"
            );
        }
    }
}

fn enrich(item: ContentItem, requester_region: Option<&str>) -> EnrichedContent {
    let performance = score_engagement(&item.analytics);
    let region_access = requester_region.map(|region| evaluate_region(&item, Some(region)));
    EnrichedContent {
        content: item,
        performance,
        region_access,
    }
}

fn ensure_transition(item: &ContentItem, action: &str, legal: bool) -> Result<(), DomainError> {
    if legal {
        Ok(())
    } else {
        Err(DomainError::InvalidTransition {
            from: item.status,
            action: action.to_string(),
        })
    }
}

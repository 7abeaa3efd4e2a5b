//! Content handlers
//!
//! Endpoints for the content governance lifecycle: listing, intake,
//! review transitions, region restrictions, and age checks.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::{
    AgeCheckReport, ContentPage, EngagementEvent, EnrichedContent, RegionRestrictionUpdate,
};
use crate::domain::entities::{ActorId, ContentId, ContentItem, NewContent};
use crate::domain::ports::{ContentQuery, SortField, SortOrder};
use crate::error::{AppError, DomainError};
use crate::AppState;

/// Query parameters for listing content.
/// Filter values accept the literal `all` as "no filter", matching the
/// dashboard clients.
#[derive(Debug, Deserialize)]
pub struct ListContentQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub category: Option<String>,
    pub age_rating: Option<String>,
    /// Requester region; when present each record carries an access verdict
    pub region: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

/// Parse an optional filter value, treating `all` as absent
fn parse_filter<T>(raw: Option<&str>) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    match raw {
        None | Some("all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(AppError::BadRequest),
    }
}

fn wildcard(raw: Option<String>) -> Option<String> {
    raw.filter(|s| s != "all" && !s.is_empty())
}

impl ListContentQuery {
    fn into_domain(self) -> Result<(ContentQuery, Option<String>), AppError> {
        let query = ContentQuery {
            status: parse_filter(self.status.as_deref())?,
            content_type: parse_filter(self.content_type.as_deref())?,
            category: wildcard(self.category),
            age_rating: parse_filter(self.age_rating.as_deref())?,
            search: self.search.filter(|s| !s.is_empty()),
            page: self.page.max(1),
            limit: self.limit.clamp(1, 100),
            sort_by: match self.sort_by.as_deref() {
                None => SortField::CreatedAt,
                Some(s) => s.parse().map_err(AppError::BadRequest)?,
            },
            sort_order: match self.sort_order.as_deref() {
                None => SortOrder::Desc,
                Some(s) => s.parse().map_err(AppError::BadRequest)?,
            },
        };
        Ok((query, wildcard(self.region)))
    }
}

/// Request body for content intake
#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub body: serde_json::Value,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "type")]
    pub content_type: String,
    pub category: String,
    pub age_rating: String,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub organization_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApproveRequest {
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    /// Mandatory; an absent or blank reason fails the call
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RestrictRegionsRequest {
    pub allowed_regions: Option<Vec<String>>,
    pub blocked_regions: Option<Vec<String>>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AgeCheckQuery {
    pub age: String,
}

/// Request body for engagement tracking
#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub event: String,
    pub rating: Option<u8>,
}

impl RecordEventRequest {
    fn into_domain(self) -> Result<EngagementEvent, AppError> {
        match self.event.to_lowercase().as_str() {
            "view" => Ok(EngagementEvent::View),
            "completion" => Ok(EngagementEvent::Completion),
            "download" => Ok(EngagementEvent::Download),
            "share" => Ok(EngagementEvent::Share),
            "rating" => {
                let stars = self.rating.ok_or_else(|| {
                    AppError::BadRequest("rating events require a 'rating' field".to_string())
                })?;
                Ok(EngagementEvent::Rating(stars))
            }
            other => Err(AppError::BadRequest(format!(
                "Unknown engagement event '{}'. Use: view, completion, download, share, rating",
                other
            ))),
        }
    }
}

/// GET /content
///
/// Filtered, paginated listing enriched with performance metrics.
pub async fn list_content(
    State(state): State<AppState>,
    Query(query): Query<ListContentQuery>,
) -> Result<Json<ContentPage>, AppError> {
    let (domain_query, region) = query.into_domain()?;
    let page = state
        .governance_service
        .get_content(&domain_query, region.as_deref())
        .await?;

    Ok(Json(page))
}

/// GET /content/:id
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichedContent>, AppError> {
    let content = state
        .governance_service
        .get_content_by_id(&ContentId(id))
        .await?;

    Ok(Json(content))
}

/// POST /content
///
/// Author intake; the record enters the store as a draft.
pub async fn create_content(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorId>,
    Json(request): Json<CreateContentRequest>,
) -> Result<Json<EnrichedContent>, AppError> {
    let new = NewContent {
        title: request.title,
        description: request.description,
        body: request.body,
        tags: request.tags,
        keywords: request.keywords,
        content_type: request.content_type.parse().map_err(AppError::BadRequest)?,
        category: request.category,
        age_rating: request.age_rating.parse().map_err(AppError::BadRequest)?,
        min_age: request.min_age,
        max_age: request.max_age,
        organization_id: request.organization_id,
    };

    let created = state.governance_service.create_content(new, actor).await?;
    Ok(Json(created))
}

/// POST /content/:id/submit
pub async fn submit_for_review(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorId>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichedContent>, AppError> {
    let updated = state
        .governance_service
        .submit_for_review(&ContentId(id), actor)
        .await?;

    Ok(Json(updated))
}

/// POST /content/:id/review
pub async fn start_review(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorId>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichedContent>, AppError> {
    let updated = state
        .governance_service
        .start_review(&ContentId(id), actor)
        .await?;

    Ok(Json(updated))
}

/// POST /content/:id/approve
pub async fn approve(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorId>,
    Path(id): Path<Uuid>,
    request: Option<Json<ApproveRequest>>,
) -> Result<Json<EnrichedContent>, AppError> {
    let comments = request.and_then(|Json(r)| r.comments);
    let updated = state
        .governance_service
        .approve(&ContentId(id), actor, comments)
        .await?;

    Ok(Json(updated))
}

/// POST /content/:id/reject
pub async fn reject(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorId>,
    Path(id): Path<Uuid>,
    request: Option<Json<RejectRequest>>,
) -> Result<Json<EnrichedContent>, AppError> {
    let reason = request
        .and_then(|Json(r)| r.rejection_reason)
        .unwrap_or_default();
    let updated = state
        .governance_service
        .reject(&ContentId(id), actor, &reason)
        .await?;

    Ok(Json(updated))
}

/// POST /content/:id/publish
pub async fn publish(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorId>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichedContent>, AppError> {
    let updated = state
        .governance_service
        .publish(&ContentId(id), actor)
        .await?;

    Ok(Json(updated))
}

/// POST /content/:id/archive
pub async fn archive(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorId>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichedContent>, AppError> {
    let updated = state
        .governance_service
        .archive(&ContentId(id), actor)
        .await?;

    Ok(Json(updated))
}

/// PUT /content/:id/regions
///
/// Wholesale replacement of the region enforcement lists.
pub async fn restrict_regions(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorId>,
    Path(id): Path<Uuid>,
    Json(request): Json<RestrictRegionsRequest>,
) -> Result<Json<EnrichedContent>, AppError> {
    let updated = state
        .governance_service
        .restrict_regions(
            &ContentId(id),
            RegionRestrictionUpdate {
                allowed_regions: request.allowed_regions,
                blocked_regions: request.blocked_regions,
                reason: request.reason,
            },
            actor,
        )
        .await?;

    Ok(Json(updated))
}

/// POST /content/:id/revise
pub async fn create_revision(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorId>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichedContent>, AppError> {
    let revision = state
        .governance_service
        .create_revision(&ContentId(id), actor)
        .await?;

    Ok(Json(revision))
}

/// GET /content/:id/age-check?age=N
pub async fn check_age(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AgeCheckQuery>,
) -> Result<Json<AgeCheckReport>, AppError> {
    let age: u8 = query.age.parse().map_err(|_| {
        AppError::Domain(DomainError::Validation(format!(
            "Requester age must be a non-negative number, got '{}'",
            query.age
        )))
    })?;

    let report = state
        .governance_service
        .check_age(&ContentId(id), age)
        .await?;

    Ok(Json(report))
}

/// POST /content/:id/events
///
/// Engagement tracking from the delivery platform. Not a governance
/// decision: counters change, the cached score refreshes, no audit entry.
pub async fn record_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordEventRequest>,
) -> Result<Json<ContentItem>, AppError> {
    let event = request.into_domain()?;
    let updated = state
        .engagement_service
        .record(&ContentId(id), event)
        .await?;

    Ok(Json(updated))
}

//! Analytics handlers
//!
//! Read-only reporting endpoints for dashboards.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::{AnalyticsQuery, ContentAnalyticsReport, GovernanceStats, TimeRange};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for the content analytics report
#[derive(Debug, Deserialize)]
pub struct ContentAnalyticsParams {
    pub time_range: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub category: Option<String>,
}

impl ContentAnalyticsParams {
    fn into_domain(self) -> Result<AnalyticsQuery, AppError> {
        Ok(AnalyticsQuery {
            time_range: match self.time_range.as_deref() {
                None => TimeRange::Month,
                Some(s) => s.parse().map_err(AppError::BadRequest)?,
            },
            content_type: match self.content_type.as_deref() {
                None | Some("all") => None,
                Some(s) => Some(s.parse().map_err(AppError::BadRequest)?),
            },
            category: self.category.filter(|c| c != "all" && !c.is_empty()),
        })
    }
}

/// Query parameters for governance statistics
#[derive(Debug, Deserialize)]
pub struct GovernanceStatsParams {
    pub organization_id: Option<Uuid>,
}

/// GET /analytics/content
///
/// Usage report over approved/published content in the window.
pub async fn content_analytics(
    State(state): State<AppState>,
    Query(params): Query<ContentAnalyticsParams>,
) -> Result<Json<ContentAnalyticsReport>, AppError> {
    let query = params.into_domain()?;
    let report = state.analytics_service.content_analytics(&query).await?;

    Ok(Json(report))
}

/// GET /analytics/governance
///
/// Moderation-pipeline statistics, optionally per organization.
pub async fn governance_stats(
    State(state): State<AppState>,
    Query(params): Query<GovernanceStatsParams>,
) -> Result<Json<GovernanceStats>, AppError> {
    let stats = state
        .analytics_service
        .governance_stats(params.organization_id)
        .await?;

    Ok(Json(stats))
}

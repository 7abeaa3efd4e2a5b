//! Analytics service
//!
//! Read-only reporting over the content collection: fleet-wide usage
//! summaries, top and bottom performers, type/category rollups, and
//! governance statistics. Everything is a fold over content records;
//! engagement scores are recomputed from counters at read time rather than
//! trusted from the cache, so repeated calls are idempotent.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::app::scoring::{score_engagement, PerformanceMetrics, PerformanceTier};
use crate::domain::entities::{AgeRating, ContentId, ContentItem, ContentStatus, ContentType};
use crate::domain::ports::ContentRepository;
use crate::error::AppError;

/// How many top/bottom performers and categories a report carries
const RANKING_LIMIT: usize = 10;

/// Reporting window, anchored at the time of the call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    /// Lower bound of the window ending at `now`
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRange::Day => now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc(),
            TimeRange::Week => now - chrono::Duration::days(7),
            TimeRange::Month => now.checked_sub_months(chrono::Months::new(1)).unwrap_or(now),
            TimeRange::Quarter => now.checked_sub_months(chrono::Months::new(3)).unwrap_or(now),
            TimeRange::Year => now.checked_sub_months(chrono::Months::new(12)).unwrap_or(now),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(TimeRange::Day),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            _ => Err(format!("Unknown time range: {}", s)),
        }
    }
}

/// Filters for the content analytics report
#[derive(Debug, Clone)]
pub struct AnalyticsQuery {
    pub time_range: TimeRange,
    pub content_type: Option<ContentType>,
    pub category: Option<String>,
}

impl Default for AnalyticsQuery {
    fn default() -> Self {
        Self {
            time_range: TimeRange::Month,
            content_type: None,
            category: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_content: u64,
    pub total_views: i64,
    pub total_completions: i64,
    pub total_downloads: i64,
    pub avg_engagement_score: f64,
    pub avg_rating: f64,
    pub overall_completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedContent {
    pub id: ContentId,
    pub title: String,
    pub content_type: ContentType,
    pub category: String,
    pub performance: PerformanceMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeRollup {
    pub content_type: ContentType,
    pub count: u64,
    pub total_views: i64,
    pub avg_engagement: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRollup {
    pub category: String,
    pub count: u64,
    pub total_views: i64,
    pub avg_engagement: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TierDistribution {
    pub excellent: u64,
    pub good: u64,
    pub fair: u64,
    pub poor: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentAnalyticsReport {
    pub summary: AnalyticsSummary,
    pub top_content: Vec<RankedContent>,
    pub worst_content: Vec<RankedContent>,
    pub by_type: Vec<TypeRollup>,
    pub by_category: Vec<CategoryRollup>,
    pub performance_distribution: TierDistribution,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgeRatingCount {
    pub age_rating: AgeRating,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GovernanceStats {
    pub total: u64,
    pub pending_review: u64,
    pub approved: u64,
    pub rejected: u64,
    pub published: u64,
    pub by_age_rating: Vec<AgeRatingCount>,
    pub total_region_restrictions: u64,
    /// Percentage of all content that is approved, rounded
    pub approval_rate: u64,
}

/// Read-only reporting service
pub struct AnalyticsService<CR>
where
    CR: ContentRepository,
{
    contents: Arc<CR>,
}

impl<CR> AnalyticsService<CR>
where
    CR: ContentRepository,
{
    pub fn new(contents: Arc<CR>) -> Self {
        Self { contents }
    }

    /// Usage report over approved/published content in the window
    pub async fn content_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<ContentAnalyticsReport, AppError> {
        let since = query.time_range.start(Utc::now());
        let items = self
            .contents
            .find_for_analytics(since, query.content_type, query.category.as_deref())
            .await?;

        let scored: Vec<(ContentItem, PerformanceMetrics)> = items
            .into_iter()
            .map(|item| {
                let metrics = score_engagement(&item.analytics);
                (item, metrics)
            })
            .collect();

        let total = scored.len() as u64;
        let total_views: i64 = scored.iter().map(|(i, _)| i.analytics.views).sum();
        let total_completions: i64 = scored.iter().map(|(i, _)| i.analytics.completions).sum();
        let total_downloads: i64 = scored.iter().map(|(i, _)| i.analytics.downloads).sum();

        let avg_engagement_score = if total > 0 {
            scored
                .iter()
                .map(|(_, m)| m.engagement_score as f64)
                .sum::<f64>()
                / total as f64
        } else {
            0.0
        };
        let avg_rating = if total > 0 {
            scored
                .iter()
                .map(|(i, _)| i.analytics.average_rating)
                .sum::<f64>()
                / total as f64
        } else {
            0.0
        };
        let overall_completion_rate = if total_views > 0 {
            total_completions as f64 / total_views as f64 * 100.0
        } else {
            0.0
        };

        let mut ranked: Vec<&(ContentItem, PerformanceMetrics)> = scored.iter().collect();
        ranked.sort_by(|a, b| b.1.engagement_score.cmp(&a.1.engagement_score));
        let top_content = ranked
            .iter()
            .take(RANKING_LIMIT)
            .map(|(i, m)| ranked_entry(i, m))
            .collect();
        let worst_content = ranked
            .iter()
            .rev()
            .take(RANKING_LIMIT)
            .map(|(i, m)| ranked_entry(i, m))
            .collect();

        let mut by_type_map: HashMap<ContentType, (u64, i64, f64)> = HashMap::new();
        let mut by_category_map: HashMap<String, (u64, i64, f64)> = HashMap::new();
        let mut performance_distribution = TierDistribution::default();

        for (item, metrics) in &scored {
            let t = by_type_map.entry(item.content_type).or_default();
            t.0 += 1;
            t.1 += item.analytics.views;
            t.2 += metrics.engagement_score as f64;

            let c = by_category_map.entry(item.category.clone()).or_default();
            c.0 += 1;
            c.1 += item.analytics.views;
            c.2 += metrics.engagement_score as f64;

            match metrics.tier {
                PerformanceTier::Excellent => performance_distribution.excellent += 1,
                PerformanceTier::Good => performance_distribution.good += 1,
                PerformanceTier::Fair => performance_distribution.fair += 1,
                PerformanceTier::Poor => performance_distribution.poor += 1,
            }
        }

        let mut by_type: Vec<TypeRollup> = by_type_map
            .into_iter()
            .map(|(content_type, (count, views, engagement_sum))| TypeRollup {
                content_type,
                count,
                total_views: views,
                avg_engagement: round1(engagement_sum / count as f64),
            })
            .collect();
        by_type.sort_by(|a, b| b.count.cmp(&a.count));

        let mut by_category: Vec<CategoryRollup> = by_category_map
            .into_iter()
            .map(|(category, (count, views, engagement_sum))| CategoryRollup {
                category,
                count,
                total_views: views,
                avg_engagement: round1(engagement_sum / count as f64),
            })
            .collect();
        by_category.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
        by_category.truncate(RANKING_LIMIT);

        Ok(ContentAnalyticsReport {
            summary: AnalyticsSummary {
                total_content: total,
                total_views,
                total_completions,
                total_downloads,
                avg_engagement_score: round1(avg_engagement_score),
                avg_rating: round1(avg_rating),
                overall_completion_rate: round1(overall_completion_rate),
            },
            top_content,
            worst_content,
            by_type,
            by_category,
            performance_distribution,
        })
    }

    /// Moderation-pipeline statistics, optionally per organization
    pub async fn governance_stats(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<GovernanceStats, AppError> {
        let items = self.contents.find_by_organization(organization_id).await?;

        let total = items.len() as u64;
        let count_status = |status: ContentStatus| -> u64 {
            items.iter().filter(|i| i.status == status).count() as u64
        };
        let approved = count_status(ContentStatus::Approved);

        let mut rating_map: HashMap<AgeRating, u64> = HashMap::new();
        let mut total_region_restrictions: u64 = 0;
        for item in &items {
            *rating_map.entry(item.age_rating).or_default() += 1;
            total_region_restrictions += item.blocked_regions.len() as u64;
        }
        let mut by_age_rating: Vec<AgeRatingCount> = rating_map
            .into_iter()
            .map(|(age_rating, count)| AgeRatingCount { age_rating, count })
            .collect();
        by_age_rating.sort_by_key(|c| c.age_rating.minimum_age());

        let approval_rate = if total > 0 {
            (approved as f64 / total as f64 * 100.0).round() as u64
        } else {
            0
        };

        Ok(GovernanceStats {
            total,
            pending_review: count_status(ContentStatus::Pending),
            approved,
            rejected: count_status(ContentStatus::Rejected),
            published: count_status(ContentStatus::Published),
            by_age_rating,
            total_region_restrictions,
            approval_rate,
        })
    }
}

fn ranked_entry(item: &ContentItem, metrics: &PerformanceMetrics) -> RankedContent {
    RankedContent {
        id: item.id,
        title: item.title.clone(),
        content_type: item.content_type,
        category: item.category.clone(),
        performance: metrics.clone(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        test_content_with_analytics, test_content_with_status, InMemoryContentRepository,
    };

    #[tokio::test]
    async fn empty_window_returns_zeroed_report() {
        let svc = AnalyticsService::new(Arc::new(InMemoryContentRepository::new()));
        let report = svc
            .content_analytics(&AnalyticsQuery::default())
            .await
            .unwrap();

        assert_eq!(report.summary.total_content, 0);
        assert_eq!(report.summary.overall_completion_rate, 0.0);
        assert!(report.top_content.is_empty());
        assert!(report.by_type.is_empty());
    }

    #[tokio::test]
    async fn summary_folds_counters_across_items() {
        let strong = test_content_with_analytics(100, 40, 10, 4.0);
        let weak = test_content_with_analytics(20, 1, 0, 1.0);
        let repo = Arc::new(
            InMemoryContentRepository::new()
                .with_content(strong.clone())
                .with_content(weak),
        );
        let svc = AnalyticsService::new(repo);

        let report = svc
            .content_analytics(&AnalyticsQuery::default())
            .await
            .unwrap();

        assert_eq!(report.summary.total_content, 2);
        assert_eq!(report.summary.total_views, 120);
        assert_eq!(report.summary.total_completions, 41);
        // Top entry is the strong performer
        assert_eq!(report.top_content[0].id, strong.id);
        assert_eq!(report.top_content[0].performance.engagement_score, 72);
        // Worst entry is the weak one
        assert_ne!(report.worst_content[0].id, strong.id);
    }

    #[tokio::test]
    async fn distribution_counts_tiers() {
        let repo = Arc::new(
            InMemoryContentRepository::new()
                .with_content(test_content_with_analytics(100, 40, 10, 4.0)) // 72 excellent
                .with_content(test_content_with_analytics(0, 0, 0, 0.0)), // 0 poor
        );
        let svc = AnalyticsService::new(repo);

        let report = svc
            .content_analytics(&AnalyticsQuery::default())
            .await
            .unwrap();

        assert_eq!(report.performance_distribution.excellent, 1);
        assert_eq!(report.performance_distribution.poor, 1);
        assert_eq!(report.performance_distribution.good, 0);
    }

    #[tokio::test]
    async fn draft_content_is_excluded_from_analytics() {
        let repo = Arc::new(
            InMemoryContentRepository::new()
                .with_content(test_content_with_status(ContentStatus::Draft)),
        );
        let svc = AnalyticsService::new(repo);

        let report = svc
            .content_analytics(&AnalyticsQuery::default())
            .await
            .unwrap();
        assert_eq!(report.summary.total_content, 0);
    }

    #[tokio::test]
    async fn governance_stats_counts_states_and_ratings() {
        let repo = Arc::new(
            InMemoryContentRepository::new()
                .with_content(test_content_with_status(ContentStatus::Pending))
                .with_content(test_content_with_status(ContentStatus::Approved))
                .with_content(test_content_with_status(ContentStatus::Approved))
                .with_content(test_content_with_status(ContentStatus::Rejected)),
        );
        let svc = AnalyticsService::new(repo);

        let stats = svc.governance_stats(None).await.unwrap();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending_review, 1);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.published, 0);
        // 2 of 4 approved
        assert_eq!(stats.approval_rate, 50);
        assert_eq!(stats.by_age_rating.iter().map(|c| c.count).sum::<u64>(), 4);
    }

    #[tokio::test]
    async fn governance_stats_sum_blocked_regions() {
        let mut item = test_content_with_status(ContentStatus::Published);
        item.blocked_regions = vec!["IN".to_string(), "BR".to_string()];
        let repo = Arc::new(InMemoryContentRepository::new().with_content(item));
        let svc = AnalyticsService::new(repo);

        let stats = svc.governance_stats(None).await.unwrap();
        assert_eq!(stats.total_region_restrictions, 2);
    }

    #[tokio::test]
    async fn governance_stats_on_empty_store() {
        let svc = AnalyticsService::new(Arc::new(InMemoryContentRepository::new()));
        let stats = svc.governance_stats(None).await.unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.approval_rate, 0);
    }

    #[test]
    fn time_range_from_str() {
        assert_eq!("month".parse::<TimeRange>().unwrap(), TimeRange::Month);
        assert_eq!("QUARTER".parse::<TimeRange>().unwrap(), TimeRange::Quarter);
        assert!("fortnight".parse::<TimeRange>().is_err());
    }

    #[test]
    fn time_range_starts_are_ordered() {
        let now = Utc::now();
        assert!(TimeRange::Week.start(now) < now);
        assert!(TimeRange::Year.start(now) < TimeRange::Quarter.start(now));
        assert!(TimeRange::Quarter.start(now) < TimeRange::Week.start(now));
    }
}

//! Engagement scoring
//!
//! Pure derivation of a 0-100 engagement score and qualitative tier from a
//! content item's usage counters. Safe to call repeatedly; reporting relies
//! on recomputing this rather than trusting the cached score.

use serde::{Deserialize, Serialize};

use crate::domain::entities::ContentAnalytics;

/// Views needed to earn the full view-score component
const VIEW_SATURATION: f64 = 100.0;

/// Shares needed to earn the full share-score component
const SHARE_SATURATION: f64 = 10.0;

/// Component weights: views 30, completion 40, rating 20, shares 10
const VIEW_WEIGHT: f64 = 30.0;
const COMPLETION_WEIGHT: f64 = 0.4;
const RATING_WEIGHT: f64 = 4.0;
const SHARE_WEIGHT: f64 = 10.0;

/// Qualitative performance tier derived from the engagement score.
/// Boundaries are inclusive-lower: a score of exactly 70 is `excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PerformanceTier {
    /// Get tier from engagement score
    pub fn from_score(score: i32) -> Self {
        match score {
            70.. => PerformanceTier::Excellent,
            50..=69 => PerformanceTier::Good,
            30..=49 => PerformanceTier::Fair,
            _ => PerformanceTier::Poor,
        }
    }
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceTier::Excellent => write!(f, "excellent"),
            PerformanceTier::Good => write!(f, "good"),
            PerformanceTier::Fair => write!(f, "fair"),
            PerformanceTier::Poor => write!(f, "poor"),
        }
    }
}

/// Computed performance envelope returned alongside content records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub engagement_score: i32,
    /// Percentage, rounded to one decimal
    pub completion_rate: f64,
    pub tier: PerformanceTier,
    pub views: i64,
    pub completions: i64,
    pub downloads: i64,
    pub shares: i64,
    /// Rounded to one decimal
    pub average_rating: f64,
    pub rating_count: i64,
}

/// Compute the engagement score and tier from raw counters.
///
/// Each component saturates at its weight, so the sum stays in [0, 100]
/// for any non-negative counters.
pub fn score_engagement(analytics: &ContentAnalytics) -> PerformanceMetrics {
    let views = analytics.views as f64;
    let completions = analytics.completions as f64;
    let shares = analytics.shares as f64;
    let rating = analytics.average_rating;

    let completion_rate = if analytics.views > 0 {
        completions / views * 100.0
    } else {
        0.0
    };

    let view_score = (views / VIEW_SATURATION).min(1.0) * VIEW_WEIGHT;
    let completion_score = completion_rate.min(100.0) * COMPLETION_WEIGHT;
    let rating_score = rating.min(5.0) * RATING_WEIGHT;
    let share_score = (shares / SHARE_SATURATION).min(1.0) * SHARE_WEIGHT;

    let engagement_score = (view_score + completion_score + rating_score + share_score).round() as i32;

    PerformanceMetrics {
        engagement_score,
        completion_rate: round1(completion_rate),
        tier: PerformanceTier::from_score(engagement_score),
        views: analytics.views,
        completions: analytics.completions,
        downloads: analytics.downloads,
        shares: analytics.shares,
        average_rating: round1(rating),
        rating_count: analytics.rating_count,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analytics(views: i64, completions: i64, shares: i64, average_rating: f64) -> ContentAnalytics {
        ContentAnalytics {
            views,
            completions,
            shares,
            average_rating,
            ..Default::default()
        }
    }

    #[test]
    fn reference_vector_scores_72_excellent() {
        // 30 (views) + 16 (40% completion) + 16 (4-star) + 10 (shares) = 72
        let metrics = score_engagement(&analytics(100, 40, 10, 4.0));
        assert_eq!(metrics.engagement_score, 72);
        assert_eq!(metrics.tier, PerformanceTier::Excellent);
        assert_eq!(metrics.completion_rate, 40.0);
    }

    #[test]
    fn zero_views_means_zero_completion_rate() {
        let metrics = score_engagement(&analytics(0, 0, 0, 0.0));
        assert_eq!(metrics.engagement_score, 0);
        assert_eq!(metrics.completion_rate, 0.0);
        assert_eq!(metrics.tier, PerformanceTier::Poor);
    }

    #[test]
    fn components_saturate_at_their_weights() {
        // Everything maxed out: 30 + 40 + 20 + 10 = 100
        let metrics = score_engagement(&analytics(100_000, 100_000, 10_000, 5.0));
        assert_eq!(metrics.engagement_score, 100);
    }

    #[test]
    fn score_is_bounded_for_inconsistent_counters() {
        // More completions than views and an out-of-range rating still cap
        let metrics = score_engagement(&analytics(10, 500, 1_000, 9.9));
        assert!(metrics.engagement_score <= 100);
        assert!(metrics.engagement_score >= 0);
    }

    #[test]
    fn score_is_monotonic_in_each_counter() {
        let base = analytics(50, 10, 2, 3.0);
        let base_score = score_engagement(&base).engagement_score;

        let mut more_views = base.clone();
        more_views.views = 80;
        // Completion rate falls as views rise, so hold the rate by scaling
        more_views.completions = 16;
        assert!(score_engagement(&more_views).engagement_score >= base_score);

        let mut more_completions = base.clone();
        more_completions.completions = 20;
        assert!(score_engagement(&more_completions).engagement_score >= base_score);

        let mut better_rating = base.clone();
        better_rating.average_rating = 4.5;
        assert!(score_engagement(&better_rating).engagement_score >= base_score);

        let mut more_shares = base.clone();
        more_shares.shares = 8;
        assert!(score_engagement(&more_shares).engagement_score >= base_score);
    }

    #[test]
    fn scoring_is_idempotent() {
        let input = analytics(73, 21, 4, 3.7);
        assert_eq!(score_engagement(&input), score_engagement(&input));
    }

    #[test]
    fn tier_boundaries_are_inclusive_lower() {
        assert_eq!(PerformanceTier::from_score(70), PerformanceTier::Excellent);
        assert_eq!(PerformanceTier::from_score(69), PerformanceTier::Good);
        assert_eq!(PerformanceTier::from_score(50), PerformanceTier::Good);
        assert_eq!(PerformanceTier::from_score(49), PerformanceTier::Fair);
        assert_eq!(PerformanceTier::from_score(30), PerformanceTier::Fair);
        assert_eq!(PerformanceTier::from_score(29), PerformanceTier::Poor);
        assert_eq!(PerformanceTier::from_score(0), PerformanceTier::Poor);
    }

    #[test]
    fn tier_display() {
        assert_eq!(PerformanceTier::Excellent.to_string(), "excellent");
        assert_eq!(PerformanceTier::Poor.to_string(), "poor");
    }

    #[test]
    fn completion_rate_rounds_to_one_decimal() {
        // 1/3 completions -> 33.333...% -> 33.3
        let metrics = score_engagement(&analytics(3, 1, 0, 0.0));
        assert_eq!(metrics.completion_rate, 33.3);
    }
}

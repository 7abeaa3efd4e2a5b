//! Age-appropriateness evaluator
//!
//! Pure policy: given a content item and a requester age, report every
//! reason the pairing is questionable. All checks run; nothing
//! short-circuits, so callers see the complete issue list rather than just
//! the first hit. The evaluator never blocks access itself - enforcement is
//! the caller's call. The same evaluator serves pre-publication linting and
//! per-request access checks.

use serde::Serialize;

use crate::domain::entities::ContentItem;

/// Requesters at or above this age are not subject to the keyword scan
const KEYWORD_SCAN_AGE_CEILING: u8 = 13;

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

/// What kind of age rule was tripped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeIssueKind {
    AgeRating,
    MinAge,
    MaxAge,
    ContentAnalysis,
}

/// One reason the content/requester pairing is questionable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeIssue {
    #[serde(rename = "type")]
    pub kind: AgeIssueKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// Evaluator verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeCheck {
    pub is_appropriate: bool,
    pub issues: Vec<AgeIssue>,
}

/// Age-appropriateness policy with an injected keyword denylist.
///
/// The denylist is configuration, not a literal constant, so it can change
/// without touching the evaluator.
pub struct AgePolicy {
    denylist: Vec<String>,
}

impl AgePolicy {
    pub fn new(denylist: Vec<String>) -> Self {
        Self {
            denylist: denylist.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Evaluate a content item against a requester age.
    /// Pure: mutates nothing, enforces nothing.
    pub fn evaluate(&self, content: &ContentItem, requester_age: u8) -> AgeCheck {
        let mut issues = Vec::new();

        let rating_minimum = content.age_rating.minimum_age();
        if requester_age < rating_minimum {
            issues.push(AgeIssue {
                kind: AgeIssueKind::AgeRating,
                severity: Severity::High,
                message: format!(
                    "Content rated {} but requester is {} years old",
                    content.age_rating, requester_age
                ),
                keywords: Vec::new(),
            });
        }

        if let Some(min_age) = content.min_age {
            if requester_age < min_age {
                issues.push(AgeIssue {
                    kind: AgeIssueKind::MinAge,
                    severity: Severity::High,
                    message: format!(
                        "Content requires minimum age {} but requester is {}",
                        min_age, requester_age
                    ),
                    keywords: Vec::new(),
                });
            }
        }

        if let Some(max_age) = content.max_age {
            if requester_age > max_age {
                issues.push(AgeIssue {
                    kind: AgeIssueKind::MaxAge,
                    severity: Severity::Medium,
                    message: format!(
                        "Content is for ages up to {} but requester is {}",
                        max_age, requester_age
                    ),
                    keywords: Vec::new(),
                });
            }
        }

        let matches = self.scan_body(content);
        if !matches.is_empty() && requester_age < KEYWORD_SCAN_AGE_CEILING {
            issues.push(AgeIssue {
                kind: AgeIssueKind::ContentAnalysis,
                severity: Severity::High,
                message: format!(
                    "Potentially inappropriate content detected for age {}",
                    requester_age
                ),
                keywords: matches,
            });
        }

        AgeCheck {
            is_appropriate: issues.is_empty(),
            issues,
        }
    }

    /// Case-insensitive substring scan of the serialized content body
    fn scan_body(&self, content: &ContentItem) -> Vec<String> {
        let body_text = serde_json::to_string(&content.body)
            .unwrap_or_default()
            .to_lowercase();

        self.denylist
            .iter()
            .filter(|keyword| body_text.contains(keyword.as_str()))
            .cloned()
            .collect()
    }
}

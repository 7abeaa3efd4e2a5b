//! Region-access evaluator
//!
//! Pure policy deciding whether a requester region may see a content item.
//! The deny-list always wins over the allow-list: an explicit block holds
//! even if the region also appears on a non-empty allow-list.

use serde::Serialize;

use crate::domain::entities::{ContentItem, RegionRestriction};

/// Evaluator verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAccess {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The matching human-readable restriction record, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<RegionRestriction>,
}

impl RegionAccess {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            restriction: None,
        }
    }
}

/// Evaluate whether `requester_region` may access `content`.
///
/// No region supplied means allowed: the engine cannot enforce what it
/// cannot observe.
pub fn evaluate_region(content: &ContentItem, requester_region: Option<&str>) -> RegionAccess {
    let Some(region) = requester_region else {
        return RegionAccess::allowed();
    };

    // Deny-list first
    if content.blocked_regions.iter().any(|r| r == region) {
        let restriction = content
            .region_restrictions
            .iter()
            .find(|r| r.region == region)
            .cloned();
        let reason = restriction
            .as_ref()
            .map(|r| r.reason.clone())
            .unwrap_or_else(|| "Region is blocked".to_string());

        return RegionAccess {
            allowed: false,
            reason: Some(reason),
            restriction,
        };
    }

    // A non-empty allow-list is closed: only listed regions pass
    if !content.allowed_regions.is_empty() && !content.allowed_regions.iter().any(|r| r == region) {
        return RegionAccess {
            allowed: false,
            reason: Some("Region not in allowed list".to_string()),
            restriction: None,
        };
    }

    RegionAccess::allowed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        ActorId, AgeRating, ContentItem, ContentType, NewContent, RegionRestriction,
    };
    use chrono::Utc;

    fn content_with_regions(allowed: Vec<&str>, blocked: Vec<&str>) -> ContentItem {
        let mut item = ContentItem::new_draft(
            NewContent {
                title: "Lesson".to_string(),
                description: None,
                body: serde_json::json!({}),
                tags: vec![],
                keywords: vec![],
                content_type: ContentType::Lesson,
                category: "science".to_string(),
                age_rating: AgeRating::All,
                min_age: None,
                max_age: None,
                organization_id: None,
            },
            ActorId::new(),
        );
        item.allowed_regions = allowed.into_iter().map(String::from).collect();
        item.blocked_regions = blocked.into_iter().map(String::from).collect();
        item
    }

    #[test]
    fn no_region_supplied_is_allowed() {
        let content = content_with_regions(vec!["US"], vec!["IN"]);
        let access = evaluate_region(&content, None);
        assert!(access.allowed);
        assert!(access.reason.is_none());
    }

    #[test]
    fn unrestricted_content_allows_everyone() {
        let content = content_with_regions(vec![], vec![]);
        assert!(evaluate_region(&content, Some("FR")).allowed);
    }

    #[test]
    fn deny_list_wins_over_allow_list() {
        // "IN" is on both lists; the block must hold
        let content = content_with_regions(vec!["IN", "US"], vec!["IN"]);
        let access = evaluate_region(&content, Some("IN"));
        assert!(!access.allowed);
    }

    #[test]
    fn blocked_region_uses_restriction_reason_when_present() {
        let actor = ActorId::new();
        let mut content = content_with_regions(vec![], vec!["IN"]);
        content.region_restrictions.push(RegionRestriction {
            region: "IN".to_string(),
            reason: "Local curriculum requirements".to_string(),
            blocked_by: actor,
            blocked_at: Utc::now(),
        });

        let access = evaluate_region(&content, Some("IN"));
        assert!(!access.allowed);
        assert_eq!(
            access.reason.as_deref(),
            Some("Local curriculum requirements")
        );
        assert!(access.restriction.is_some());
    }

    #[test]
    fn blocked_region_falls_back_to_generic_reason() {
        let content = content_with_regions(vec![], vec!["IN"]);
        let access = evaluate_region(&content, Some("IN"));
        assert!(!access.allowed);
        assert_eq!(access.reason.as_deref(), Some("Region is blocked"));
        assert!(access.restriction.is_none());
    }

    #[test]
    fn allow_list_is_closed() {
        let content = content_with_regions(vec!["US"], vec![]);
        let access = evaluate_region(&content, Some("FR"));
        assert!(!access.allowed);
        assert_eq!(access.reason.as_deref(), Some("Region not in allowed list"));
    }

    #[test]
    fn allow_list_member_passes() {
        let content = content_with_regions(vec!["US", "CA"], vec![]);
        assert!(evaluate_region(&content, Some("CA")).allowed);
    }
}

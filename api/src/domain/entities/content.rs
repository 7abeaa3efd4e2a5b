//! Content domain entity
//!
//! Represents a piece of user-generated educational content moving through
//! the governance lifecycle. The audit trail on each item is append-only:
//! every governance decision adds exactly one entry and nothing is ever
//! rewritten or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(pub Uuid);

impl ContentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ContentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an already-authenticated actor (author, reviewer, admin).
///
/// Credential verification happens upstream; the engine only records who
/// performed each decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ActorId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of educational content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Lesson,
    Template,
    Module,
    Course,
    Resource,
    Activity,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Lesson => write!(f, "lesson"),
            ContentType::Template => write!(f, "template"),
            ContentType::Module => write!(f, "module"),
            ContentType::Course => write!(f, "course"),
            ContentType::Resource => write!(f, "resource"),
            ContentType::Activity => write!(f, "activity"),
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lesson" => Ok(ContentType::Lesson),
            "template" => Ok(ContentType::Template),
            "module" => Ok(ContentType::Module),
            "course" => Ok(ContentType::Course),
            "resource" => Ok(ContentType::Resource),
            "activity" => Ok(ContentType::Activity),
            _ => Err(format!("Unknown content type: {}", s)),
        }
    }
}

/// Audience age rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeRating {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "3+")]
    ThreePlus,
    #[serde(rename = "7+")]
    SevenPlus,
    #[serde(rename = "10+")]
    TenPlus,
    #[serde(rename = "13+")]
    ThirteenPlus,
    #[serde(rename = "16+")]
    SixteenPlus,
    #[serde(rename = "18+")]
    EighteenPlus,
}

impl AgeRating {
    /// Minimum requester age implied by the rating
    pub fn minimum_age(&self) -> u8 {
        match self {
            AgeRating::All => 0,
            AgeRating::ThreePlus => 3,
            AgeRating::SevenPlus => 7,
            AgeRating::TenPlus => 10,
            AgeRating::ThirteenPlus => 13,
            AgeRating::SixteenPlus => 16,
            AgeRating::EighteenPlus => 18,
        }
    }
}

impl std::fmt::Display for AgeRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeRating::All => write!(f, "all"),
            AgeRating::ThreePlus => write!(f, "3+"),
            AgeRating::SevenPlus => write!(f, "7+"),
            AgeRating::TenPlus => write!(f, "10+"),
            AgeRating::ThirteenPlus => write!(f, "13+"),
            AgeRating::SixteenPlus => write!(f, "16+"),
            AgeRating::EighteenPlus => write!(f, "18+"),
        }
    }
}

impl std::str::FromStr for AgeRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(AgeRating::All),
            "3+" => Ok(AgeRating::ThreePlus),
            "7+" => Ok(AgeRating::SevenPlus),
            "10+" => Ok(AgeRating::TenPlus),
            "13+" => Ok(AgeRating::ThirteenPlus),
            "16+" => Ok(AgeRating::SixteenPlus),
            "18+" => Ok(AgeRating::EighteenPlus),
            _ => Err(format!("Unknown age rating: {}", s)),
        }
    }
}

/// Governance lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Published,
    Archived,
}

impl ContentStatus {
    /// States from which a reviewer may approve or reject
    pub fn is_reviewable(&self) -> bool {
        matches!(self, ContentStatus::Pending | ContentStatus::UnderReview)
    }

    /// States from which submission (or resubmission) for review is legal.
    /// `Rejected` is deliberately included: rejection is terminal except for
    /// the explicit resubmit-after-revision edge.
    pub fn is_submittable(&self) -> bool {
        matches!(self, ContentStatus::Draft | ContentStatus::Rejected)
    }

    /// Non-terminal states may be archived
    pub fn is_archivable(&self) -> bool {
        !matches!(self, ContentStatus::Rejected | ContentStatus::Archived)
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentStatus::Draft => write!(f, "draft"),
            ContentStatus::Pending => write!(f, "pending"),
            ContentStatus::UnderReview => write!(f, "under_review"),
            ContentStatus::Approved => write!(f, "approved"),
            ContentStatus::Rejected => write!(f, "rejected"),
            ContentStatus::Published => write!(f, "published"),
            ContentStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ContentStatus::Draft),
            "pending" => Ok(ContentStatus::Pending),
            "under_review" => Ok(ContentStatus::UnderReview),
            "approved" => Ok(ContentStatus::Approved),
            "rejected" => Ok(ContentStatus::Rejected),
            "published" => Ok(ContentStatus::Published),
            "archived" => Ok(ContentStatus::Archived),
            _ => Err(format!("Unknown content status: {}", s)),
        }
    }
}

/// Governance action recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    SubmittedForReview,
    ReviewStarted,
    Approved,
    Rejected,
    Published,
    Archived,
    RegionRestrictionSet,
    Revised,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Created => write!(f, "created"),
            AuditAction::SubmittedForReview => write!(f, "submitted_for_review"),
            AuditAction::ReviewStarted => write!(f, "review_started"),
            AuditAction::Approved => write!(f, "approved"),
            AuditAction::Rejected => write!(f, "rejected"),
            AuditAction::Published => write!(f, "published"),
            AuditAction::Archived => write!(f, "archived"),
            AuditAction::RegionRestrictionSet => write!(f, "region_restriction_set"),
            AuditAction::Revised => write!(f, "revised"),
        }
    }
}

/// One immutable governance decision record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub performed_by: ActorId,
    pub performed_at: DateTime<Utc>,
    pub changes: serde_json::Value,
    pub reason: Option<String>,
}

/// Human-readable record of why a region was blocked.
/// Distinct from the enforcement list itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRestriction {
    pub region: String,
    pub reason: String,
    pub blocked_by: ActorId,
    pub blocked_at: DateTime<Utc>,
}

/// Usage counters plus the cached derived metrics.
///
/// `engagement_score` and `completion_rate` are caches over the counters,
/// recomputed whenever a counter changes; they are never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentAnalytics {
    pub views: i64,
    pub completions: i64,
    pub downloads: i64,
    pub shares: i64,
    pub average_rating: f64,
    pub rating_count: i64,
    pub engagement_score: i32,
    pub completion_rate: f64,
}

/// A piece of educational content under governance
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    pub description: Option<String>,
    /// Opaque authored payload (slides, questions, media refs, ...)
    pub body: serde_json::Value,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub content_type: ContentType,
    pub category: String,
    pub age_rating: AgeRating,
    /// Explicit overrides narrowing the rating's audience
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub status: ContentStatus,
    pub created_by: ActorId,
    pub organization_id: Option<Uuid>,
    pub submitted_for_review: Option<DateTime<Utc>>,
    pub reviewed_by: Option<ActorId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub approved_by: Option<ActorId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<ActorId>,
    pub rejected_at: Option<DateTime<Utc>>,
    /// Non-empty whenever status is `rejected`
    pub rejection_reason: Option<String>,
    /// Closed allow-list; empty means unrestricted
    pub allowed_regions: Vec<String>,
    /// Deny-list; always evaluated before the allow-list
    pub blocked_regions: Vec<String>,
    pub region_restrictions: Vec<RegionRestriction>,
    pub analytics: ContentAnalytics,
    pub version: i32,
    pub parent_version: Option<ContentId>,
    pub is_latest_version: bool,
    pub audit_trail: Vec<AuditEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Create a fresh draft from author intake data.
    /// The draft starts its audit trail with a `created` entry.
    pub fn new_draft(new: NewContent, created_by: ActorId) -> Self {
        let now = Utc::now();
        let mut item = Self {
            id: ContentId::new(),
            title: new.title,
            description: new.description,
            body: new.body,
            tags: new.tags,
            keywords: new.keywords,
            content_type: new.content_type,
            category: new.category,
            age_rating: new.age_rating,
            min_age: new.min_age,
            max_age: new.max_age,
            status: ContentStatus::Draft,
            created_by,
            organization_id: new.organization_id,
            submitted_for_review: None,
            reviewed_by: None,
            reviewed_at: None,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            allowed_regions: Vec::new(),
            blocked_regions: Vec::new(),
            region_restrictions: Vec::new(),
            analytics: ContentAnalytics::default(),
            version: 1,
            parent_version: None,
            is_latest_version: true,
            audit_trail: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        item.record_audit(AuditEntry {
            action: AuditAction::Created,
            performed_by: created_by,
            performed_at: now,
            changes: serde_json::json!({ "status": ContentStatus::Draft }),
            reason: None,
        });
        item
    }

    /// Append one entry to the audit trail. Entries are never reordered,
    /// edited, or removed.
    pub fn record_audit(&mut self, entry: AuditEntry) {
        self.audit_trail.push(entry);
    }

    /// Append an audit entry stamped with the current time
    pub fn audit(
        &mut self,
        action: AuditAction,
        performed_by: ActorId,
        changes: serde_json::Value,
        reason: Option<String>,
    ) {
        self.record_audit(AuditEntry {
            action,
            performed_by,
            performed_at: Utc::now(),
            changes,
            reason,
        });
    }

    /// Derive the next revision of this item: a new draft one version up,
    /// pointing back at this record. Region enforcement carries over;
    /// review metadata, analytics, and the audit trail start fresh.
    pub fn next_revision(&self, actor: ActorId) -> ContentItem {
        let now = Utc::now();
        let mut revision = ContentItem {
            id: ContentId::new(),
            title: self.title.clone(),
            description: self.description.clone(),
            body: self.body.clone(),
            tags: self.tags.clone(),
            keywords: self.keywords.clone(),
            content_type: self.content_type,
            category: self.category.clone(),
            age_rating: self.age_rating,
            min_age: self.min_age,
            max_age: self.max_age,
            status: ContentStatus::Draft,
            created_by: actor,
            organization_id: self.organization_id,
            submitted_for_review: None,
            reviewed_by: None,
            reviewed_at: None,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            allowed_regions: self.allowed_regions.clone(),
            blocked_regions: self.blocked_regions.clone(),
            region_restrictions: self.region_restrictions.clone(),
            analytics: ContentAnalytics::default(),
            version: self.version + 1,
            parent_version: Some(self.id),
            is_latest_version: true,
            audit_trail: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        revision.record_audit(AuditEntry {
            action: AuditAction::Revised,
            performed_by: actor,
            performed_at: now,
            changes: serde_json::json!({
                "parent_version": self.id,
                "version": self.version + 1,
            }),
            reason: None,
        });
        revision
    }
}

/// Author intake data for a new draft
#[derive(Debug, Clone)]
pub struct NewContent {
    pub title: String,
    pub description: Option<String>,
    pub body: serde_json::Value,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub content_type: ContentType,
    pub category: String,
    pub age_rating: AgeRating,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub organization_id: Option<Uuid>,
}

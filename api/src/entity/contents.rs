//! `contents` table model

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub body: Json,
    pub tags: Json,
    pub keywords: Json,
    pub content_type: String,
    pub category: String,
    pub age_rating: String,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub status: String,
    pub created_by: Uuid,
    pub organization_id: Option<Uuid>,
    pub submitted_for_review: Option<DateTimeWithTimeZone>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
    pub allowed_regions: Json,
    pub blocked_regions: Json,
    pub region_restrictions: Json,
    pub views: i64,
    pub completions: i64,
    pub downloads: i64,
    pub shares: i64,
    pub average_rating: f64,
    pub rating_count: i64,
    pub engagement_score: i32,
    pub completion_rate: f64,
    pub version: i32,
    pub parent_version: Option<Uuid>,
    pub is_latest_version: bool,
    pub audit_trail: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

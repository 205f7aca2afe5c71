//! Post database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub views: i64,
}

/// Aggregate row for an author's dashboard
#[derive(Debug, Clone, Copy, FromRow)]
pub struct AuthorTotalsModel {
    pub post_count: i64,
    pub total_views: i64,
    pub total_comments: i64,
}

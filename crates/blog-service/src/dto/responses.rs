//! Response DTOs
//!
//! Everything here implements `Serialize`; the same structs feed the JSON
//! endpoints and the template contexts of the HTML pages.

use blog_core::{FollowState, Page};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Common Response Types
// ============================================================================

/// A page of results with the numbers the pager needs
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub num_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u32>,
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        let pagination = PaginationMeta {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            num_pages: page.num_pages(),
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            next_page: page.has_next().then(|| page.page + 1),
            previous_page: page.has_previous().then(|| page.page - 1),
        };
        Self {
            data: page.items,
            pagination,
        }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Tokens for a freshly opened or refreshed session
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

impl AuthResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user: CurrentUserResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// The signed-in user, including private fields
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Identity established from a live session
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    #[serde(skip)]
    pub session_id: Uuid,
}

// ============================================================================
// User & Profile Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PublicUserResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub username: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub is_author: bool,
    pub created_at: DateTime<Utc>,
}

/// Everything shown on an author's public page
#[derive(Debug, Serialize)]
pub struct AuthorPageResponse {
    pub author: ProfileResponse,
    pub posts: Vec<PostResponse>,
    pub followers_count: i64,
    pub following_count: i64,
    pub is_following: bool,
    pub is_self: bool,
}

// ============================================================================
// Follow Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ToggleFollowResponse {
    pub status: FollowState,
    pub followers_count: i64,
}

// ============================================================================
// Category Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

// ============================================================================
// Post Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author: PublicUserResponse,
    pub category: Option<CategoryResponse>,
    pub featured_image_url: Option<String>,
    pub published: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Home and search page context
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub posts: PaginatedResponse<PostResponse>,
    pub query: Option<String>,
    pub categories: Vec<CategoryResponse>,
    pub total_published: i64,
}

/// Post detail page context
#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub comments_count: i64,
    pub is_following: bool,
    pub is_owner: bool,
}

// ============================================================================
// Comment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub author: String,
    pub body: String,
    /// `%Y-%m-%d %H:%M`
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCommentResponse {
    pub status: &'static str,
    pub comment: CommentResponse,
    pub comments_count: i64,
}

impl AddCommentResponse {
    pub fn ok(comment: CommentResponse, comments_count: i64) -> Self {
        Self {
            status: "ok",
            comment,
            comments_count,
        }
    }
}

// ============================================================================
// View Responses
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PostViewResponse {
    pub views: i64,
}

// ============================================================================
// Dashboard Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: PublicUserResponse,
    pub posts: Vec<PostResponse>,
    pub totals: DashboardTotals,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DashboardTotals {
    pub post_count: i64,
    pub total_views: i64,
    pub total_comments: i64,
    pub followers_count: i64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let label = |healthy: bool| if healthy { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if database_healthy && redis_healthy {
                "ready"
            } else {
                "not_ready"
            }
            .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: label(database_healthy),
                redis: label(redis_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

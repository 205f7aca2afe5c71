//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use uuid::Uuid;

use super::pagination::{Page, PageRequest, PostFilter};
use crate::entities::{
    AuthorTotals, Category, Comment, FollowState, Post, PostView, Profile, User,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Find user by username or (case-insensitive) email
    async fn find_by_login(&self, login: &str) -> RepoResult<Option<User>>;

    /// Batch lookup, order not guaranteed
    async fn find_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<User>>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Insert user and profile in a single transaction
    async fn create_with_profile(
        &self,
        user: &User,
        password_hash: &str,
        profile: &Profile,
    ) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile belonging to a user
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Option<Profile>>;

    /// Persist bio, avatar and author flag
    async fn update(&self, profile: &Profile) -> RepoResult<()>;
}

// ============================================================================
// Follow Repository
// ============================================================================

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Flip the edge follower -> following and report the resulting state.
    /// Concurrent toggles never produce duplicate edges.
    async fn toggle(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<FollowState>;

    /// Check if the edge exists
    async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool>;

    /// Number of users following `user_id`
    async fn follower_count(&self, user_id: Uuid) -> RepoResult<i64>;

    /// Number of users `user_id` follows
    async fn following_count(&self, user_id: Uuid) -> RepoResult<i64>;
}

// ============================================================================
// Category Repository
// ============================================================================

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Category>>;

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>>;

    /// All categories ordered by name
    async fn list_all(&self) -> RepoResult<Vec<Category>>;

    /// Insert unless a category with the same name exists, then return the stored row.
    /// Fails with `CategorySlugTaken` if another name already owns the slug.
    async fn get_or_create(&self, category: &Category) -> RepoResult<Category>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Post>>;

    async fn slug_exists(&self, slug: &str) -> RepoResult<bool>;

    /// Insert a new post. A duplicate slug fails with `SlugTaken`.
    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Update editable fields (title, content, image, category, published, updated_at)
    async fn update(&self, post: &Post) -> RepoResult<()>;

    /// Delete a post; comments and view events cascade. Returns false if nothing was deleted.
    async fn delete(&self, id: Uuid) -> RepoResult<bool>;

    /// Published posts, newest first
    async fn list_published(&self, filter: &PostFilter, page: PageRequest)
        -> RepoResult<Page<Post>>;

    /// Total number of published posts
    async fn count_published(&self) -> RepoResult<i64>;

    /// Posts of one author, newest first
    async fn find_by_author(&self, author_id: Uuid, published_only: bool) -> RepoResult<Vec<Post>>;

    /// Post count, view sum and comment count across an author's posts
    async fn author_totals(&self, author_id: Uuid) -> RepoResult<AuthorTotals>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    /// Comments of a post, oldest first
    async fn find_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Comment>>;

    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64>;
}

// ============================================================================
// View Repository
// ============================================================================

#[async_trait]
pub trait ViewRepository: Send + Sync {
    /// Store the event and increment the post counter atomically.
    /// Returns the committed counter value.
    async fn record(&self, view: &PostView) -> RepoResult<i64>;
}

//! Entity to DTO mappers
//!
//! Plain `From` conversions where the entity carries everything, and small
//! pairing structs where a response needs data from several entities.

use blog_core::{Category, Comment, Post, Profile, User};

use super::responses::{
    CategoryResponse, CommentResponse, CurrentUserResponse, PostResponse, ProfileResponse,
    PublicUserResponse,
};

/// Characters kept in list excerpts
pub const EXCERPT_CHARS: usize = 200;

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// A user with the profile provisioned for them
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub profile: Profile,
}

impl UserProfile {
    pub fn to_response(&self, avatar_url: Option<String>) -> ProfileResponse {
        ProfileResponse {
            user_id: self.user.id,
            username: self.user.username.clone(),
            bio: self.profile.bio.clone(),
            avatar_url,
            is_author: self.profile.is_author,
            created_at: self.profile.created_at,
        }
    }
}

// ============================================================================
// Content Mappers
// ============================================================================

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.to_string(),
        }
    }
}

/// A post with the rows its page shows next to it
#[derive(Debug, Clone, Copy)]
pub struct PostWithDetails<'a> {
    pub post: &'a Post,
    pub author: &'a User,
    pub category: Option<&'a Category>,
}

impl PostWithDetails<'_> {
    pub fn to_response(&self, featured_image_url: Option<String>) -> PostResponse {
        let post = self.post;
        PostResponse {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.to_string(),
            content: post.content.clone(),
            excerpt: post.excerpt(EXCERPT_CHARS),
            author: PublicUserResponse::from(self.author),
            category: self.category.map(CategoryResponse::from),
            featured_image_url,
            published: post.published,
            views: post.views,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// A comment and the username of whoever wrote it
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: String,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(value: CommentWithAuthor) -> Self {
        Self {
            created_at: value.comment.display_timestamp(),
            author: value.author,
            body: value.comment.body,
        }
    }
}

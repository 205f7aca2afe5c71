//! Post entity - the central content object
//!
//! A post belongs to exactly one author for its whole life, carries a
//! slug derived once from its title, and counts its views.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::value_objects::{AssetRef, Slug, SlugError};

/// Blog post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: Slug,
    /// Rich text, stored as HTML
    pub content: String,
    pub featured_image: Option<AssetRef>,
    pub category_id: Option<Uuid>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub views: i64,
}

impl Post {
    pub const MAX_TITLE_LEN: usize = 250;

    /// Create an unpublished draft, deriving the slug from the title
    pub fn new(author_id: Uuid, title: &str, content: &str) -> Result<Self, DomainError> {
        let title = Self::validate_title(title)?;
        let content = Self::validate_content(content)?;
        let slug = Slug::from_text(&title).map_err(|e| match e {
            SlugError::Empty => DomainError::InvalidSlug(
                "title must contain at least one letter or digit".to_string(),
            ),
            other => DomainError::from(other),
        })?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            content,
            featured_image: None,
            category_id: None,
            published: false,
            created_at: now,
            updated_at: now,
            views: 0,
        })
    }

    /// Trimmed title, 1 to 250 characters
    pub fn validate_title(title: &str) -> Result<String, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::ValidationError("Title is required".to_string()));
        }
        if title.chars().count() > Self::MAX_TITLE_LEN {
            return Err(DomainError::ValidationError(format!(
                "Title must be at most {} characters",
                Self::MAX_TITLE_LEN
            )));
        }
        Ok(title.to_string())
    }

    pub fn validate_content(content: &str) -> Result<String, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::ValidationError("Content is required".to_string()));
        }
        Ok(content.to_string())
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Published posts are public, drafts only visible to their author
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.published || viewer.is_some_and(|id| self.is_owned_by(id))
    }

    /// Change the title without touching the slug
    pub fn set_title(&mut self, title: &str) -> Result<(), DomainError> {
        self.title = Self::validate_title(title)?;
        Ok(())
    }

    pub fn set_content(&mut self, content: &str) -> Result<(), DomainError> {
        self.content = Self::validate_content(content)?;
        Ok(())
    }

    /// Replace the featured image, returning the previous reference if it changed
    pub fn replace_image(&mut self, image: Option<AssetRef>) -> Option<AssetRef> {
        if self.featured_image == image {
            return None;
        }
        std::mem::replace(&mut self.featured_image, image)
    }

    /// Refresh `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Plain-text excerpt of the content, at most `max_chars` characters
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut text = String::with_capacity(self.content.len());
        let mut in_tag = false;
        for c in self.content.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        let text = words.join(" ");
        if text.chars().count() <= max_chars {
            return text;
        }
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Aggregates over an author's posts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorTotals {
    pub post_count: i64,
    pub total_views: i64,
    pub total_comments: i64,
}

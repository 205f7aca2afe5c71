//! Request DTOs for pages and ajax endpoints
//!
//! Form and JSON inputs implement `Deserialize` and `Validate`. Uploaded files
//! never pass through serde; handlers hand them to services as [`ImageChange`].

use blog_core::NewAsset;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Account creation form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[serde(default)]
    pub password_confirm: String,
}

/// Login form; `login` is a username or an email address
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub login: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

// ============================================================================
// Profile Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(length(max = 5000, message = "Bio must be at most 5000 characters"))]
    pub bio: String,
}

// ============================================================================
// Post Requests
// ============================================================================

/// Fields of the create and edit post forms
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostFormRequest {
    #[validate(length(min = 1, max = 250, message = "Title must be 1-250 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    /// Selected existing category
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<Uuid>,

    /// Free-text category, created on demand; wins over `category`
    #[serde(default)]
    #[validate(length(max = 80, message = "Category name must be at most 80 characters"))]
    pub new_category: Option<String>,

    #[serde(default, deserialize_with = "checkbox")]
    pub published: bool,
}

impl PostFormRequest {
    /// The trimmed free-text category, if one was typed
    pub fn new_category_name(&self) -> Option<&str> {
        self.new_category
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// What to do with an image slot (featured image or avatar) on save
#[derive(Debug, Default)]
pub enum ImageChange {
    #[default]
    Keep,
    Replace(NewAsset),
    Clear,
}

impl ImageChange {
    /// Build from an optional upload and a "clear" checkbox; an upload wins
    pub fn from_form(upload: Option<NewAsset>, clear: bool) -> Self {
        match upload {
            Some(asset) if !asset.is_empty() => Self::Replace(asset),
            _ if clear => Self::Clear,
            _ => Self::Keep,
        }
    }
}

// ============================================================================
// Listing Requests
// ============================================================================

/// Query string of the home and search pages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub q: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u32>,
}

// ============================================================================
// Ajax Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ToggleFollowRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostViewRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "Comment must be 1-5000 characters"))]
    pub body: String,
}

// ============================================================================
// Form helpers
// ============================================================================

/// HTML forms send `""` for an unselected option
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Checkboxes arrive as `on`, `true` or `1` when ticked and are absent otherwise
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(raw.as_str(), "on" | "true" | "1" | "yes"))
}

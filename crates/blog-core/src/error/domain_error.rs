//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

use crate::value_objects::AssetKind;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Profile not found for user {0}")]
    ProfileNotFound(Uuid),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    #[error("Comment body cannot be empty")]
    EmptyComment,

    #[error("Upload a valid image (PNG, JPEG, GIF or WebP)")]
    InvalidImage(AssetKind),

    #[error("You cannot follow yourself")]
    SelfFollow,

    // Uniqueness violations are reported as validation failures
    #[error("A post with slug '{0}' already exists")]
    SlugTaken(String),

    #[error("A different category already uses slug '{0}'")]
    CategorySlugTaken(String),

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already in use")]
    EmailTaken,

    // =========================================================================
    // Authentication / Authorization Errors
    // =========================================================================
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Only authors can create posts")]
    NotAuthor,

    #[error("You are not the owner of this post")]
    NotPostOwner,

    #[error("You can only edit your own profile")]
    NotProfileOwner,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::CategoryNotFound(_) => "UNKNOWN_CATEGORY",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidSlug(_) => "INVALID_SLUG",
            Self::EmptyComment => "EMPTY_COMMENT",
            Self::InvalidImage(_) => "INVALID_IMAGE",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::SlugTaken(_) => "SLUG_TAKEN",
            Self::CategorySlugTaken(_) => "CATEGORY_SLUG_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",

            // Authentication / Authorization
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::NotAuthor => "NOT_AUTHOR",
            Self::NotPostOwner => "NOT_POST_OWNER",
            Self::NotProfileOwner => "NOT_PROFILE_OWNER",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ProfileNotFound(_)
                | Self::PostNotFound(_)
                | Self::CategoryNotFound(_)
        )
    }

    /// Check if this is a validation error (including uniqueness violations)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
                | Self::InvalidSlug(_)
                | Self::EmptyComment
                | Self::InvalidImage(_)
                | Self::SelfFollow
                | Self::SlugTaken(_)
                | Self::CategorySlugTaken(_)
                | Self::UsernameTaken
                | Self::EmailTaken
        )
    }

    /// Check if this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotAuthor | Self::NotPostOwner | Self::NotProfileOwner
        )
    }

    /// Check if this is a uniqueness conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SlugTaken(_) | Self::CategorySlugTaken(_) | Self::UsernameTaken | Self::EmailTaken
        )
    }

    /// Check if this error comes from an infrastructure component
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_)
                | Self::CacheError(_)
                | Self::StorageError(_)
                | Self::InternalError(_)
        )
    }
}

impl From<crate::value_objects::SlugError> for DomainError {
    fn from(err: crate::value_objects::SlugError) -> Self {
        Self::InvalidSlug(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::PostNotFound("hello-world".to_string());
        assert_eq!(err.code(), "UNKNOWN_POST");

        let err = DomainError::SlugTaken("hello-world".to_string());
        assert_eq!(err.code(), "SLUG_TAKEN");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::UserNotFound("alice".to_string()).is_not_found());
        assert!(DomainError::PostNotFound("x".to_string()).is_not_found());
        assert!(!DomainError::EmailTaken.is_not_found());
    }

    #[test]
    fn test_conflicts_are_validation() {
        for err in [
            DomainError::SlugTaken("a".to_string()),
            DomainError::CategorySlugTaken("a".to_string()),
            DomainError::UsernameTaken,
            DomainError::EmailTaken,
        ] {
            assert!(err.is_conflict());
            assert!(err.is_validation());
        }
        assert!(DomainError::SelfFollow.is_validation());
        assert!(!DomainError::SelfFollow.is_conflict());
    }

    #[test]
    fn test_is_authorization() {
        assert!(DomainError::NotPostOwner.is_authorization());
        assert!(DomainError::NotAuthor.is_authorization());
        assert!(!DomainError::NotAuthenticated.is_authorization());
        assert!(DomainError::NotAuthenticated.is_authentication());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::SlugTaken("hello-world".to_string());
        assert_eq!(
            err.to_string(),
            "A post with slug 'hello-world' already exists"
        );

        let err = DomainError::PostNotFound("missing".to_string());
        assert_eq!(err.to_string(), "Post not found: missing");
    }
}

//! Category entity - flat post taxonomy

use uuid::Uuid;

use crate::error::DomainError;
use crate::value_objects::{Slug, SlugError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: Slug,
}

impl Category {
    pub const MAX_NAME_LEN: usize = 80;
    pub const MAX_SLUG_LEN: usize = 100;

    /// Build a category from a free-text name, trimming it and deriving the slug
    pub fn from_name(name: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::ValidationError(
                "Category name cannot be empty".to_string(),
            ));
        }
        if name.chars().count() > Self::MAX_NAME_LEN {
            return Err(DomainError::ValidationError(format!(
                "Category name must be at most {} characters",
                Self::MAX_NAME_LEN
            )));
        }

        let slug = Slug::from_text(name).map_err(|e| match e {
            SlugError::Empty => DomainError::ValidationError(
                "Category name must contain letters or digits".to_string(),
            ),
            other => DomainError::from(other),
        })?;
        if slug.as_str().len() > Self::MAX_SLUG_LEN {
            return Err(DomainError::InvalidSlug(format!(
                "category slug longer than {} characters",
                Self::MAX_SLUG_LEN
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        let category = Category::from_name("  Web Development ").unwrap();
        assert_eq!(category.name, "Web Development");
        assert_eq!(category.slug.as_str(), "web-development");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(Category::from_name("   ").unwrap_err().is_validation());
        assert!(Category::from_name("???").unwrap_err().is_validation());
    }

    #[test]
    fn test_long_name_rejected() {
        let err = Category::from_name(&"x".repeat(81)).unwrap_err();
        assert!(err.is_validation());
    }
}

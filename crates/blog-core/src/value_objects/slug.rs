//! Slug - URL-safe identifier derived from a human readable title
//!
//! Slugs are lowercase ASCII alphanumerics separated by single dashes,
//! e.g. `"Hello World"` -> `"hello-world"`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// URL-safe identifier for posts and categories
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

/// Error when a slug cannot be produced or parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("text does not contain any letters or digits")]
    Empty,

    #[error("slug is longer than {max} characters")]
    TooLong { max: usize },

    #[error("invalid slug: {0}")]
    Invalid(String),
}

impl Slug {
    /// Longest slug accepted anywhere in the system
    pub const MAX_LEN: usize = 300;

    /// Derive a slug from free text (a post title or category name)
    pub fn from_text(text: &str) -> Result<Self, SlugError> {
        let slug = slug::slugify(text.trim());
        if slug.is_empty() {
            return Err(SlugError::Empty);
        }
        if slug.len() > Self::MAX_LEN {
            return Err(SlugError::TooLong { max: Self::MAX_LEN });
        }
        Ok(Self(slug))
    }

    /// Parse an existing slug, e.g. from a URL path segment
    pub fn parse(value: &str) -> Result<Self, SlugError> {
        if value.is_empty() {
            return Err(SlugError::Empty);
        }
        if value.len() > Self::MAX_LEN {
            return Err(SlugError::TooLong { max: Self::MAX_LEN });
        }
        let well_formed = value
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        if !well_formed {
            return Err(SlugError::Invalid(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

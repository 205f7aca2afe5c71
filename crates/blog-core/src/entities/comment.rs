//! Comment entity - reader response attached to a post

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub moderated: bool,
}

impl Comment {
    /// Create a comment; the body is trimmed and must not be empty
    pub fn new(post_id: Uuid, author_id: Uuid, body: &str) -> Result<Self, DomainError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::EmptyComment);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            body: body.to_string(),
            created_at: Utc::now(),
            moderated: false,
        })
    }

    /// Timestamp as shown next to the comment
    pub fn display_timestamp(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_body_trimmed() {
        let comment = Comment::new(Uuid::new_v4(), Uuid::new_v4(), "  Nice post!\n").unwrap();
        assert_eq!(comment.body, "Nice post!");
        assert!(!comment.moderated);
    }

    #[test]
    fn test_blank_body_rejected() {
        let err = Comment::new(Uuid::new_v4(), Uuid::new_v4(), " \t\n").unwrap_err();
        assert!(matches!(err, DomainError::EmptyComment));
    }

    #[test]
    fn test_display_timestamp() {
        let mut comment = Comment::new(Uuid::new_v4(), Uuid::new_v4(), "hi").unwrap();
        comment.created_at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap();
        assert_eq!(comment.display_timestamp(), "2024-03-09 14:05");
    }
}

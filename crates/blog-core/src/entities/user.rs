//! User entity - represents a registered account

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Registered account. The credential hash lives only in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Longest accepted username
    pub const MAX_USERNAME_LEN: usize = 150;

    /// Create a new User with a fresh id
    pub fn new(username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Usernames are letters, digits and `@.+-_`, like most web frameworks accept
    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty()
            && username.chars().count() <= Self::MAX_USERNAME_LEN
            && username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    }

    /// Check whether the given login string (username or email) names this user
    pub fn matches_login(&self, login: &str) -> bool {
        self.username == login || self.email.eq_ignore_ascii_case(login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(User::is_valid_username("alice"));
        assert!(User::is_valid_username("bob_99"));
        assert!(User::is_valid_username("first.last+blog"));
        assert!(!User::is_valid_username(""));
        assert!(!User::is_valid_username("has space"));
        assert!(!User::is_valid_username(&"a".repeat(151)));
    }

    #[test]
    fn test_matches_login() {
        let user = User::new("alice".to_string(), "Alice@Example.com".to_string());
        assert!(user.matches_login("alice"));
        assert!(user.matches_login("alice@example.com"));
        assert!(!user.matches_login("Alice"));
    }
}

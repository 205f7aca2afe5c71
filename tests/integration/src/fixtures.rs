//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Distinguishes this test run from earlier ones against the same database
fn run_tag() -> &'static str {
    static TAG: OnceLock<String> = OnceLock::new();
    TAG.get_or_init(|| uuid::Uuid::new_v4().simple().to_string()[..8].to_string())
}

/// Get a unique suffix for test data
pub fn unique_suffix() -> String {
    format!("{}{}", run_tag(), COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Signup form fields
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn unique(prefix: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("{prefix}{suffix}"),
            email: format!("{prefix}{suffix}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("username", self.username.clone()),
            ("email", self.email.clone()),
            ("password", self.password.clone()),
            ("password_confirm", self.password.clone()),
        ]
    }
}

/// Create/edit post form fields
#[derive(Debug, Clone)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub new_category: String,
    pub published: bool,
}

impl PostForm {
    /// A published post titled `"{title} {suffix}"`
    pub fn unique(title: &str) -> Self {
        Self {
            title: format!("{title} {}", unique_suffix()),
            content: "<p>Integration test body</p>".to_string(),
            new_category: String::new(),
            published: true,
        }
    }

    pub fn draft(title: &str) -> Self {
        Self {
            published: false,
            ..Self::unique(title)
        }
    }

    /// The slug the server derives from the title
    pub fn expected_slug(&self) -> String {
        self.title.to_lowercase().replace(' ', "-")
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("content", self.content.clone()),
            ("category", String::new()),
            ("new_category", self.new_category.clone()),
        ];
        if self.published {
            fields.push(("published", "on".to_string()));
        }
        fields
    }
}

/// JSON error body
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Auth response from `/auth/refresh`
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleFollowResponse {
    pub status: String,
    pub followers_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct PostViewResponse {
    pub views: i64,
}

#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub author: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentResponse {
    pub status: String,
    pub comment: CommentResponse,
    pub comments_count: i64,
}

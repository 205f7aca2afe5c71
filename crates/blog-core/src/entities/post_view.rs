//! PostView entity - one recorded read of a post

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Append-only view event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Option<Uuid>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post_id: Uuid, user_id: Option<Uuid>, ip_address: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            ip_address,
            created_at: Utc::now(),
        }
    }
}

//! Follow entity - directed edge of the social graph

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// `follower` follows `following`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follow {
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Resulting state after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowState {
    Followed,
    Unfollowed,
}

impl FollowState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Followed => "followed",
            Self::Unfollowed => "unfollowed",
        }
    }
}

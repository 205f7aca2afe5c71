//! Profile entity - per-user public details

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::AssetRef;

/// Public profile, exactly one per user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: Uuid,
    pub bio: String,
    pub avatar: Option<AssetRef>,
    /// Gates post creation
    pub is_author: bool,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Default profile provisioned together with a new account
    pub fn for_new_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            bio: String::new(),
            avatar: None,
            is_author: true,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Replace the avatar, returning the previous reference if it is no longer used
    pub fn replace_avatar(&mut self, avatar: Option<AssetRef>) -> Option<AssetRef> {
        if self.avatar == avatar {
            return None;
        }
        std::mem::replace(&mut self.avatar, avatar)
    }
}

//! Follow service
//!
//! Toggling follow edges between users and the counts shown on author pages.

use blog_core::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::ToggleFollowResponse;

use super::authenticated;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Follow service
pub struct FollowService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FollowService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Follow `target_username` if not yet followed, unfollow otherwise
    ///
    /// The follower count is read again after the change.
    #[instrument(skip(self))]
    pub async fn toggle(
        &self,
        acting_user: Option<Uuid>,
        target_username: &str,
    ) -> ServiceResult<ToggleFollowResponse> {
        let follower_id = authenticated(acting_user)?;

        let target_username = target_username.trim();
        if target_username.is_empty() {
            return Err(ServiceError::validation("Username is required"));
        }

        let target = self
            .ctx
            .user_repo()
            .find_by_username(target_username)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", target_username))?;

        if target.id == follower_id {
            return Err(DomainError::SelfFollow.into());
        }

        let status = self.ctx.follow_repo().toggle(follower_id, target.id).await?;
        let followers_count = self.ctx.follow_repo().follower_count(target.id).await?;

        info!(
            follower_id = %follower_id,
            following_id = %target.id,
            status = status.as_str(),
            "Follow toggled"
        );

        Ok(ToggleFollowResponse {
            status,
            followers_count,
        })
    }

    /// Anonymous viewers never follow anyone
    #[instrument(skip(self))]
    pub async fn is_following(&self, viewer: Option<Uuid>, target_id: Uuid) -> ServiceResult<bool> {
        match viewer {
            None => Ok(false),
            Some(viewer_id) if viewer_id == target_id => Ok(false),
            Some(viewer_id) => Ok(self.ctx.follow_repo().exists(viewer_id, target_id).await?),
        }
    }

    pub async fn follower_count(&self, user_id: Uuid) -> ServiceResult<i64> {
        Ok(self.ctx.follow_repo().follower_count(user_id).await?)
    }

    pub async fn following_count(&self, user_id: Uuid) -> ServiceResult<i64> {
        Ok(self.ctx.follow_repo().following_count(user_id).await?)
    }
}

//! Profile service
//!
//! Author pages and editing of the caller's own profile.

use blog_core::{AssetKind, DomainError, User};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{AuthorPageResponse, ImageChange, ProfileResponse, UpdateProfileRequest, UserProfile};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::follow::FollowService;
use super::post::PostService;
use super::authenticated;

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// User and profile behind a username
    #[instrument(skip(self))]
    pub async fn get_profile(&self, username: &str) -> ServiceResult<UserProfile> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", username))?;
        self.with_profile(user).await
    }

    /// Profile of the caller, for the edit form
    #[instrument(skip(self))]
    pub async fn get_own(&self, acting_user: Option<Uuid>) -> ServiceResult<UserProfile> {
        let user_id = authenticated(acting_user)?;
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;
        self.with_profile(user).await
    }

    /// Author page: profile, published posts, follow counts
    #[instrument(skip(self))]
    pub async fn author_page(
        &self,
        username: &str,
        viewer: Option<Uuid>,
    ) -> ServiceResult<AuthorPageResponse> {
        let found = self.get_profile(username).await?;
        let author_id = found.user.id;

        let follows = FollowService::new(self.ctx);
        let posts = PostService::new(self.ctx)
            .list_by_author(author_id, true)
            .await?;

        Ok(AuthorPageResponse {
            author: self.to_response(&found),
            posts,
            followers_count: follows.follower_count(author_id).await?,
            following_count: follows.following_count(author_id).await?,
            is_following: follows.is_following(viewer, author_id).await?,
            is_self: viewer == Some(author_id),
        })
    }

    /// Update the caller's own bio and avatar
    ///
    /// The profile is always looked up from the caller's identity; a replaced
    /// or cleared avatar is released after the update is stored.
    #[instrument(skip(self, request, avatar))]
    pub async fn update_profile(
        &self,
        acting_user: Option<Uuid>,
        request: UpdateProfileRequest,
        avatar: ImageChange,
    ) -> ServiceResult<ProfileResponse> {
        let user_id = authenticated(acting_user)?;
        let found = self.get_own(Some(user_id)).await?;
        let UserProfile { user, mut profile } = found;

        if !profile.is_owned_by(user_id) {
            return Err(DomainError::NotProfileOwner.into());
        }

        profile.bio = request.bio.trim().to_string();

        let (fresh, stale) = match avatar {
            ImageChange::Keep => (None, None),
            ImageChange::Clear => (None, profile.replace_avatar(None)),
            ImageChange::Replace(upload) => {
                upload.image_format(AssetKind::Avatar)?;
                let stored = self.ctx.asset_store().store(AssetKind::Avatar, upload).await?;
                (Some(stored.clone()), profile.replace_avatar(Some(stored)))
            }
        };

        if let Err(e) = self.ctx.profile_repo().update(&profile).await {
            if let Some(fresh) = &fresh {
                self.ctx.release_asset(fresh).await;
            }
            return Err(e.into());
        }

        if let Some(stale) = &stale {
            self.ctx.release_asset(stale).await;
        }

        info!(user_id = %user_id, "Profile updated");

        Ok(self.to_response(&UserProfile { user, profile }))
    }

    pub fn to_response(&self, found: &UserProfile) -> ProfileResponse {
        found.to_response(self.ctx.asset_url(found.profile.avatar.as_ref()))
    }

    async fn with_profile(&self, user: User) -> ServiceResult<UserProfile> {
        let profile = self
            .ctx
            .profile_repo()
            .find_by_user(user.id)
            .await?
            .ok_or(DomainError::ProfileNotFound(user.id))?;
        Ok(UserProfile { user, profile })
    }
}

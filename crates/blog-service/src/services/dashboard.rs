//! Dashboard service

use tracing::instrument;
use uuid::Uuid;

use crate::dto::{DashboardResponse, DashboardTotals, PublicUserResponse};

use super::authenticated;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::post::PostService;

/// Dashboard service
pub struct DashboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DashboardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's posts, drafts included, with their totals
    #[instrument(skip(self))]
    pub async fn overview(&self, acting_user: Option<Uuid>) -> ServiceResult<DashboardResponse> {
        let user_id = authenticated(acting_user)?;
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        let posts = PostService::new(self.ctx).list_by_author(user_id, false).await?;
        let totals = self.ctx.post_repo().author_totals(user_id).await?;
        let followers_count = self.ctx.follow_repo().follower_count(user_id).await?;

        Ok(DashboardResponse {
            user: PublicUserResponse::from(&user),
            posts,
            totals: DashboardTotals {
                post_count: totals.post_count,
                total_views: totals.total_views,
                total_comments: totals.total_comments,
                followers_count,
            },
        })
    }
}

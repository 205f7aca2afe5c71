//! View tracking service

use blog_core::PostView;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::post::PostService;

/// View tracking service
pub struct ViewService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ViewService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record one view of a visible post and return the committed counter
    ///
    /// Every call stores an event; there is no de-duplication per viewer.
    #[instrument(skip(self))]
    pub async fn record(
        &self,
        slug: &str,
        viewer: Option<Uuid>,
        ip_address: Option<String>,
    ) -> ServiceResult<i64> {
        let post = PostService::new(self.ctx).get_for_viewer(slug, viewer).await?;

        let event = PostView::new(post.id, viewer, ip_address);
        let views = self.ctx.view_repo().record(&event).await?;

        debug!(post_id = %post.id, views, "View recorded");
        Ok(views)
    }
}

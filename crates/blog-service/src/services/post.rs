//! Post service
//!
//! Authoring, editing and deleting posts, and the public listings. Featured
//! images are stored before the row is written and released once nothing
//! references them any more.

use std::collections::HashMap;

use blog_core::{
    AssetKind, Category, DomainError, NewAsset, Page, PageRequest, Post, PostFilter,
    User,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{
    HomeResponse, ImageChange, ListPostsQuery, PaginatedResponse, PostDetailResponse,
    PostFormRequest, PostResponse, PostWithDetails,
};

use super::authenticated;
use super::category::CategoryService;
use super::comment::CommentService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::follow::FollowService;

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Authoring
    // ========================================================================

    /// Create a post for the caller, who must be an author
    ///
    /// The slug comes from the title once and for all; an existing slug
    /// fails the whole operation.
    #[instrument(skip(self, request, image), fields(title = %request.title))]
    pub async fn create(
        &self,
        acting_user: Option<Uuid>,
        request: PostFormRequest,
        image: Option<NewAsset>,
    ) -> ServiceResult<Post> {
        let author_id = authenticated(acting_user)?;

        let profile = self
            .ctx
            .profile_repo()
            .find_by_user(author_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(author_id))?;
        if !profile.is_author {
            return Err(DomainError::NotAuthor.into());
        }

        let mut post = Post::new(author_id, &request.title, &request.content)?;
        let image = image.filter(|u| !u.is_empty());
        if let Some(upload) = &image {
            upload.image_format(AssetKind::PostImage)?;
        }

        if self.ctx.post_repo().slug_exists(post.slug.as_str()).await? {
            return Err(DomainError::SlugTaken(post.slug.to_string()).into());
        }

        post.category_id = self.resolve_category(&request).await?;
        post.published = request.published;

        if let Some(upload) = image {
            post.featured_image = Some(
                self.ctx
                    .asset_store()
                    .store(AssetKind::PostImage, upload)
                    .await?,
            );
        }

        if let Err(e) = self.ctx.post_repo().create(&post).await {
            if let Some(image) = &post.featured_image {
                self.ctx.release_asset(image).await;
            }
            return Err(e.into());
        }

        info!(post_id = %post.id, slug = %post.slug, "Post created");
        Ok(post)
    }

    /// Update a post owned by the caller; the slug never changes
    #[instrument(skip(self, request, image))]
    pub async fn update(
        &self,
        acting_user: Option<Uuid>,
        slug: &str,
        request: PostFormRequest,
        image: ImageChange,
    ) -> ServiceResult<Post> {
        let mut post = self.get_for_edit(acting_user, slug).await?;

        post.set_title(&request.title)?;
        post.set_content(&request.content)?;
        post.category_id = self.resolve_category(&request).await?;
        post.published = request.published;

        let (fresh, stale) = match image {
            ImageChange::Keep => (None, None),
            ImageChange::Clear => (None, post.replace_image(None)),
            ImageChange::Replace(upload) => {
                upload.image_format(AssetKind::PostImage)?;
                let stored = self
                    .ctx
                    .asset_store()
                    .store(AssetKind::PostImage, upload)
                    .await?;
                (Some(stored.clone()), post.replace_image(Some(stored)))
            }
        };
        post.touch();

        if let Err(e) = self.ctx.post_repo().update(&post).await {
            if let Some(fresh) = &fresh {
                self.ctx.release_asset(fresh).await;
            }
            return Err(e.into());
        }

        if let Some(stale) = &stale {
            self.ctx.release_asset(stale).await;
        }

        info!(post_id = %post.id, slug = %post.slug, "Post updated");
        Ok(post)
    }

    /// Delete a post owned by the caller, then release its featured image
    #[instrument(skip(self))]
    pub async fn delete(&self, acting_user: Option<Uuid>, slug: &str) -> ServiceResult<()> {
        let post = self.get_for_edit(acting_user, slug).await?;

        if !self.ctx.post_repo().delete(post.id).await? {
            return Err(DomainError::PostNotFound(slug.to_string()).into());
        }

        if let Some(image) = &post.featured_image {
            self.ctx.release_asset(image).await;
        }

        info!(post_id = %post.id, slug = %post.slug, "Post deleted");
        Ok(())
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// A post as seen by `viewer`: drafts exist only for their author
    #[instrument(skip(self))]
    pub async fn get_for_viewer(&self, slug: &str, viewer: Option<Uuid>) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_slug(slug)
            .await?
            .filter(|post| post.is_visible_to(viewer))
            .ok_or_else(|| DomainError::PostNotFound(slug.to_string()).into())
    }

    /// A post the caller may edit or delete
    #[instrument(skip(self))]
    pub async fn get_for_edit(&self, acting_user: Option<Uuid>, slug: &str) -> ServiceResult<Post> {
        let user_id = authenticated(acting_user)?;
        let post = self
            .ctx
            .post_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(slug.to_string()))?;
        if !post.is_owned_by(user_id) {
            return Err(DomainError::NotPostOwner.into());
        }
        Ok(post)
    }

    /// Detail page: the post, its comments, and whether the viewer follows its author
    #[instrument(skip(self))]
    pub async fn detail(&self, slug: &str, viewer: Option<Uuid>) -> ServiceResult<PostDetailResponse> {
        let post = self.get_for_viewer(slug, viewer).await?;
        let comments = CommentService::new(self.ctx).list(post.id).await?;
        let is_following = FollowService::new(self.ctx)
            .is_following(viewer, post.author_id)
            .await?;

        Ok(PostDetailResponse {
            is_owner: viewer.is_some_and(|id| post.is_owned_by(id)),
            post: self.to_response(&post).await?,
            comments_count: comments.len() as i64,
            comments,
            is_following,
        })
    }

    /// Published posts, newest first, optionally filtered by a substring of
    /// title or content
    #[instrument(skip(self))]
    pub async fn list_published(
        &self,
        query: Option<&str>,
        page: u32,
    ) -> ServiceResult<PaginatedResponse<PostResponse>> {
        let filter = PostFilter::search(query);
        let page = self
            .ctx
            .post_repo()
            .list_published(&filter, PageRequest::new(page))
            .await?;

        if page.is_out_of_range() {
            return Err(ServiceError::not_found("Page", page.page.to_string()));
        }

        let items = self.to_responses(&page.items).await?;
        let request = PageRequest {
            page: page.page,
            per_page: page.per_page,
        };
        Ok(PaginatedResponse::from(Page::new(items, page.total, request)))
    }

    /// Home and search page context
    #[instrument(skip(self))]
    pub async fn home(&self, query: &ListPostsQuery) -> ServiceResult<HomeResponse> {
        let filter = PostFilter::search(query.q.as_deref());
        let posts = self
            .list_published(filter.query.as_deref(), query.page.unwrap_or(1))
            .await?;
        let categories = CategoryService::new(self.ctx).list().await?;
        let total_published = self.ctx.post_repo().count_published().await?;

        Ok(HomeResponse {
            posts,
            query: filter.query,
            categories,
            total_published,
        })
    }

    /// All posts of an author, newest first
    #[instrument(skip(self))]
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        published_only: bool,
    ) -> ServiceResult<Vec<PostResponse>> {
        let posts = self
            .ctx
            .post_repo()
            .find_by_author(author_id, published_only)
            .await?;
        self.to_responses(&posts).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    pub async fn to_response(&self, post: &Post) -> ServiceResult<PostResponse> {
        let mut responses = self.to_responses(std::slice::from_ref(post)).await?;
        responses
            .pop()
            .ok_or_else(|| ServiceError::internal("post response missing"))
    }

    /// Attach authors, categories and image URLs to a batch of posts
    pub async fn to_responses(&self, posts: &[Post]) -> ServiceResult<Vec<PostResponse>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<Uuid, User> = self
            .ctx
            .user_repo()
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let categories: HashMap<Uuid, Category> = if posts.iter().any(|p| p.category_id.is_some()) {
            self.ctx
                .category_repo()
                .list_all()
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect()
        } else {
            HashMap::new()
        };

        posts
            .iter()
            .map(|post| {
                let author = authors.get(&post.author_id).ok_or_else(|| {
                    ServiceError::internal(format!("author {} of post {} missing", post.author_id, post.id))
                })?;
                let details = PostWithDetails {
                    post,
                    author,
                    category: post.category_id.and_then(|id| categories.get(&id)),
                };
                Ok(details.to_response(self.ctx.asset_url(post.featured_image.as_ref())))
            })
            .collect()
    }

    /// A typed new category wins over the selected one
    async fn resolve_category(&self, request: &PostFormRequest) -> ServiceResult<Option<Uuid>> {
        if let Some(name) = request.new_category_name() {
            let category = CategoryService::new(self.ctx).get_or_create(name).await?;
            return Ok(Some(category.id));
        }

        match request.category {
            None => Ok(None),
            Some(id) => self
                .ctx
                .category_repo()
                .find_by_id(id)
                .await?
                .map(|c| Some(c.id))
                .ok_or_else(|| ServiceError::validation("Select a valid category")),
        }
    }
}

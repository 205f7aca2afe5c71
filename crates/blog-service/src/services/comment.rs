//! Comment service

use std::collections::HashMap;

use blog_core::{Comment, DomainError};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{AddCommentRequest, AddCommentResponse, CommentResponse, CommentWithAuthor};

use super::authenticated;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::post::PostService;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Comment on a post the caller can see; returns the comment and the new count
    #[instrument(skip(self, request))]
    pub async fn add(
        &self,
        acting_user: Option<Uuid>,
        slug: &str,
        request: AddCommentRequest,
    ) -> ServiceResult<AddCommentResponse> {
        let user_id = authenticated(acting_user)?;
        let post = PostService::new(self.ctx)
            .get_for_viewer(slug, Some(user_id))
            .await?;

        let comment = Comment::new(post.id, user_id, &request.body)?;
        self.ctx.comment_repo().create(&comment).await?;
        let comments_count = self.ctx.comment_repo().count_by_post(post.id).await?;

        let author = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))?;

        info!(post_id = %post.id, comment_id = %comment.id, "Comment added");

        Ok(AddCommentResponse::ok(
            CommentResponse::from(CommentWithAuthor {
                comment,
                author: author.username,
            }),
            comments_count,
        ))
    }

    /// Comments of a post, oldest first
    #[instrument(skip(self))]
    pub async fn list(&self, post_id: Uuid) -> ServiceResult<Vec<CommentResponse>> {
        let comments = self.ctx.comment_repo().find_by_post(post_id).await?;
        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let usernames: HashMap<Uuid, String> = self
            .ctx
            .user_repo()
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = usernames
                    .get(&comment.author_id)
                    .cloned()
                    .unwrap_or_default();
                CommentResponse::from(CommentWithAuthor { comment, author })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::PostFormRequest;
    use crate::services::error::ServiceError;
    use crate::services::testing::TestBackend;

    async fn publish(ctx: &ServiceContext, author: Uuid, title: &str, published: bool) {
        PostService::new(ctx)
            .create(
                Some(author),
                PostFormRequest {
                    title: title.to_string(),
                    content: "Body".to_string(),
                    published,
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
    }

    fn body(text: &str) -> AddCommentRequest {
        AddCommentRequest {
            body: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_comment_returns_fresh_count() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let alice = backend.add_user("alice");
        let bob = backend.add_user("bob");
        publish(&ctx, alice.id, "Hello World", true).await;
        let service = CommentService::new(&ctx);

        let first = service.add(Some(bob.id), "hello-world", body(" First! ")).await.unwrap();
        assert_eq!(first.status, "ok");
        assert_eq!(first.comment.author, "bob");
        assert_eq!(first.comment.body, "First!");
        assert_eq!(first.comments_count, 1);

        let second = service.add(Some(alice.id), "hello-world", body("Thanks")).await.unwrap();
        assert_eq!(second.comments_count, 2);

        let post = ctx.post_repo().find_by_slug("hello-world").await.unwrap().unwrap();
        let listed = service.list(post.id).await.unwrap();
        let authors: Vec<&str> = listed.iter().map(|c| c.author.as_str()).collect();
        assert_eq!(authors, vec!["bob", "alice"]);
    }

    #[tokio::test]
    async fn test_add_comment_rejections() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let alice = backend.add_user("alice");
        let bob = backend.add_user("bob");
        publish(&ctx, alice.id, "Hello World", true).await;
        publish(&ctx, alice.id, "Draft", false).await;
        let service = CommentService::new(&ctx);

        let err = service.add(None, "hello-world", body("hi")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated));

        let err = service.add(Some(bob.id), "hello-world", body("   ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::EmptyComment)));
        assert_eq!(err.status_code(), 400);

        let err = service.add(Some(bob.id), "draft", body("hi")).await.unwrap_err();
        assert!(err.is_not_found());

        assert!(service.add(Some(alice.id), "draft", body("note to self")).await.is_ok());
        assert_eq!(backend.comment_count(), 1);
    }
}

//! Category / post / comment entity <-> model mappers

use blog_core::entities::{AuthorTotals, Category, Comment, Post};
use blog_core::error::DomainError;
use blog_core::value_objects::{AssetRef, Slug};

use crate::models::{AuthorTotalsModel, CategoryModel, CommentModel, PostModel};

fn stored_slug(value: &str) -> Result<Slug, DomainError> {
    Slug::parse(value)
        .map_err(|e| DomainError::DatabaseError(format!("corrupt slug '{value}' in storage: {e}")))
}

impl TryFrom<CategoryModel> for Category {
    type Error = DomainError;

    fn try_from(model: CategoryModel) -> Result<Self, Self::Error> {
        Ok(Category {
            id: model.id,
            slug: stored_slug(&model.slug)?,
            name: model.name,
        })
    }
}

impl TryFrom<PostModel> for Post {
    type Error = DomainError;

    fn try_from(model: PostModel) -> Result<Self, Self::Error> {
        Ok(Post {
            id: model.id,
            author_id: model.author_id,
            slug: stored_slug(&model.slug)?,
            title: model.title,
            content: model.content,
            featured_image: model.featured_image.map(AssetRef::new),
            category_id: model.category_id,
            published: model.published,
            created_at: model.created_at,
            updated_at: model.updated_at,
            views: model.views,
        })
    }
}

pub(crate) fn posts_from_models(models: Vec<PostModel>) -> Result<Vec<Post>, DomainError> {
    models.into_iter().map(Post::try_from).collect()
}

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: model.id,
            post_id: model.post_id,
            author_id: model.author_id,
            body: model.body,
            created_at: model.created_at,
            moderated: model.moderated,
        }
    }
}

impl From<AuthorTotalsModel> for AuthorTotals {
    fn from(model: AuthorTotalsModel) -> Self {
        AuthorTotals {
            post_count: model.post_count,
            total_views: model.total_views,
            total_comments: model.total_comments,
        }
    }
}

//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use blog_core::entities::{AuthorTotals, Post};
use blog_core::error::DomainError;
use blog_core::traits::{Page, PageRequest, PostFilter, PostRepository, RepoResult};

use crate::mappers::posts_from_models;
use crate::models::{AuthorTotalsModel, PostModel};

use super::error::{map_db_error, map_unique_violation};

const POST_COLUMNS: &str = "id, author_id, title, slug, content, featured_image, category_id, \
                            published, created_at, updated_at, views";

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1");
        sqlx::query_as::<_, PostModel>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(Post::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(r"SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, post), fields(slug = %post.slug))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, author_id, title, slug, content, featured_image, category_id,
                               published, created_at, updated_at, views)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.title)
        .bind(post.slug.as_str())
        .bind(&post.content)
        .bind(post.featured_image.as_ref().map(|a| a.as_str()))
        .bind(post.category_id)
        .bind(post.published)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(post.views)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::SlugTaken(post.slug.to_string())))?;

        Ok(())
    }

    #[instrument(skip(self, post), fields(slug = %post.slug))]
    async fn update(&self, post: &Post) -> RepoResult<()> {
        // slug, author and views are never written here
        let result = sqlx::query(
            r"
            UPDATE posts
            SET title = $2, content = $3, featured_image = $4, category_id = $5,
                published = $6, updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.featured_image.as_ref().map(|a| a.as_str()))
        .bind(post.category_id)
        .bind(post.published)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(post.slug.to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(r"DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_published(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Post>> {
        let pattern = filter.like_pattern();

        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM posts
            WHERE published
              AND ($1::TEXT IS NULL OR title ILIKE $1 OR content ILIKE $1)
            ",
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE published AND ($1::TEXT IS NULL OR title ILIKE $1 OR content ILIKE $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, PostModel>(&sql)
            .bind(pattern.as_deref())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(posts_from_models(rows)?, total, page))
    }

    #[instrument(skip(self))]
    async fn count_published(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(r"SELECT COUNT(*) FROM posts WHERE published")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_by_author(&self, author_id: Uuid, published_only: bool) -> RepoResult<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE author_id = $1 AND (published OR NOT $2) \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, PostModel>(&sql)
            .bind(author_id)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        posts_from_models(rows)
    }

    #[instrument(skip(self))]
    async fn author_totals(&self, author_id: Uuid) -> RepoResult<AuthorTotals> {
        let row = sqlx::query_as::<_, AuthorTotalsModel>(
            r"
            SELECT
                COUNT(*) AS post_count,
                COALESCE(SUM(p.views), 0)::BIGINT AS total_views,
                (
                    SELECT COUNT(*)
                    FROM comments c
                    JOIN posts cp ON cp.id = c.post_id
                    WHERE cp.author_id = $1
                ) AS total_comments
            FROM posts p
            WHERE p.author_id = $1
            ",
        )
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }
}

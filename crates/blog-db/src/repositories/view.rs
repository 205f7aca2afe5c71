//! PostgreSQL implementation of ViewRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::entities::PostView;
use blog_core::error::DomainError;
use blog_core::traits::{RepoResult, ViewRepository};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgViewRepository {
    pool: PgPool,
}

impl PgViewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViewRepository for PgViewRepository {
    #[instrument(skip(self, view), fields(post_id = %view.post_id))]
    async fn record(&self, view: &PostView) -> RepoResult<i64> {
        let not_found = || DomainError::PostNotFound(view.post_id.to_string());
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO post_views (id, post_id, user_id, ip_address, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(view.id)
        .bind(view.post_id)
        .bind(view.user_id)
        .bind(view.ip_address.as_deref())
        .bind(view.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|d| d.is_foreign_key_violation()) {
                not_found()
            } else {
                map_db_error(e)
            }
        })?;

        // Row lock serializes concurrent increments; nothing is lost
        let views = sqlx::query_scalar::<_, i64>(
            r"
            UPDATE posts SET views = views + 1
            WHERE id = $1
            RETURNING views
            ",
        )
        .bind(view.post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(not_found)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(views)
    }
}

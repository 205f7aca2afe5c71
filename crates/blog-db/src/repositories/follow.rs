//! PostgreSQL implementation of FollowRepository
//!
//! The toggle deletes first and only inserts when nothing was deleted, with
//! `ON CONFLICT DO NOTHING` so racing togglers cannot create a second edge.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use blog_core::entities::FollowState;
use blog_core::error::DomainError;
use blog_core::traits::{FollowRepository, RepoResult};

use super::error::{is_check_violation, map_db_error};

#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    #[instrument(skip(self))]
    async fn toggle(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<FollowState> {
        let deleted = sqlx::query(
            r"
            DELETE FROM follows
            WHERE follower_id = $1 AND following_id = $2
            ",
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if deleted.rows_affected() > 0 {
            return Ok(FollowState::Unfollowed);
        }

        sqlx::query(
            r"
            INSERT INTO follows (follower_id, following_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (follower_id, following_id) DO NOTHING
            ",
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_check_violation(&e) {
                DomainError::SelfFollow
            } else {
                map_db_error(e)
            }
        })?;

        Ok(FollowState::Followed)
    }

    #[instrument(skip(self))]
    async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2
            )
            ",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn follower_count(&self, user_id: Uuid) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(r"SELECT COUNT(*) FROM follows WHERE following_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn following_count(&self, user_id: Uuid) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(r"SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}

//! Login session storage in Redis.

use async_trait::async_trait;
use redis::AsyncCommands;
use uuid::Uuid;

use blog_core::entities::Session;
use blog_core::error::DomainError;
use blog_core::traits::{RepoResult, SessionStore};

use crate::pool::RedisPool;

/// Key prefix for sessions
const SESSION_PREFIX: &str = "session:";

/// Key prefix for the per-user session index
const USER_SESSIONS_PREFIX: &str = "user_sessions:";

/// Session store backed by Redis
#[derive(Clone, Debug)]
pub struct RedisSessionStore {
    pool: RedisPool,
}

impl RedisSessionStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(session_id: Uuid) -> String {
        format!("{SESSION_PREFIX}{session_id}")
    }

    fn user_key(user_id: Uuid) -> String {
        format!("{USER_SESSIONS_PREFIX}{user_id}")
    }
}

fn cache_err(e: redis::RedisError) -> DomainError {
    DomainError::CacheError(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    #[tracing::instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id))]
    async fn create(&self, session: &Session) -> RepoResult<()> {
        let ttl = session.remaining_secs().max(1);
        self.pool
            .set_json(&Self::key(session.id), session, ttl.unsigned_abs())
            .await?;

        let user_key = Self::user_key(session.user_id);
        let mut conn = self.pool.get().await.map_err(DomainError::from)?;
        conn.sadd::<_, _, ()>(&user_key, session.id.to_string())
            .await
            .map_err(cache_err)?;
        // the index lives as long as the newest session
        conn.expire::<_, ()>(&user_key, ttl)
            .await
            .map_err(cache_err)?;

        tracing::debug!("Stored session");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, session_id: Uuid) -> RepoResult<Option<Session>> {
        let session: Option<Session> = self.pool.get_json(&Self::key(session_id)).await?;
        Ok(session.filter(|s| !s.is_expired()))
    }

    #[tracing::instrument(skip(self))]
    async fn revoke(&self, session_id: Uuid) -> RepoResult<()> {
        let key = Self::key(session_id);
        if let Some(session) = self.pool.get_json::<Session>(&key).await? {
            let mut conn = self.pool.get().await.map_err(DomainError::from)?;
            conn.srem::<_, _, ()>(Self::user_key(session.user_id), session_id.to_string())
                .await
                .map_err(cache_err)?;
        }

        if self.pool.delete(&key).await? {
            tracing::debug!("Revoked session");
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64> {
        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await.map_err(DomainError::from)?;

        let session_ids: Vec<String> = conn
            .smembers(&user_key)
            .await
            .map_err(cache_err)?;

        let keys: Vec<String> = session_ids
            .iter()
            .map(|id| format!("{SESSION_PREFIX}{id}"))
            .collect();

        let revoked: u64 = if keys.is_empty() {
            0
        } else {
            conn.del(&keys).await.map_err(cache_err)?
        };
        conn.del::<_, ()>(&user_key).await.map_err(cache_err)?;

        tracing::info!(revoked, "Revoked all sessions for user");
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        let id = Uuid::nil();
        assert_eq!(
            RedisSessionStore::key(id),
            "session:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            RedisSessionStore::user_key(id),
            "user_sessions:00000000-0000-0000-0000-000000000000"
        );
    }
}

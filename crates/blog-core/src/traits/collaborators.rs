//! Ports for external collaborators that are not relational storage

use async_trait::async_trait;
use uuid::Uuid;

use super::repositories::RepoResult;
use crate::entities::Session;
use crate::value_objects::{AssetKind, AssetRef, NewAsset};

// ============================================================================
// Session Store
// ============================================================================

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a session until its expiry
    async fn create(&self, session: &Session) -> RepoResult<()>;

    /// Find a live session
    async fn find(&self, session_id: Uuid) -> RepoResult<Option<Session>>;

    /// Revoke one session
    async fn revoke(&self, session_id: Uuid) -> RepoResult<()>;

    /// Revoke every session of a user, returning how many were removed
    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64>;
}

// ============================================================================
// Asset Store
// ============================================================================

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store a binary and return its reference
    async fn store(&self, kind: AssetKind, asset: NewAsset) -> RepoResult<AssetRef>;

    /// Release a stored binary. Deleting a missing asset is not an error.
    async fn delete(&self, asset: &AssetRef) -> RepoResult<()>;

    /// Public URL for a reference
    fn url_for(&self, asset: &AssetRef) -> String;
}

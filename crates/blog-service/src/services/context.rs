//! Service context - dependency container for services
//!
//! Holds the repositories, the session and asset stores, and the auth helpers.
//! Everything sits behind a trait object so the same services run against
//! PostgreSQL/Redis in the server and against in-memory fakes in tests.

use std::sync::Arc;

use blog_common::auth::{JwtService, PasswordService};
use blog_core::traits::{
    AssetStore, CategoryRepository, CommentRepository, FollowRepository, PostRepository,
    ProfileRepository, SessionStore, UserRepository, ViewRepository,
};
use blog_core::AssetRef;
use tracing::warn;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    follow_repo: Arc<dyn FollowRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    post_repo: Arc<dyn PostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    view_repo: Arc<dyn ViewRepository>,

    // Collaborators
    session_store: Arc<dyn SessionStore>,
    asset_store: Arc<dyn AssetStore>,

    // Auth
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    pub fn follow_repo(&self) -> &dyn FollowRepository {
        self.follow_repo.as_ref()
    }

    pub fn category_repo(&self) -> &dyn CategoryRepository {
        self.category_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn view_repo(&self) -> &dyn ViewRepository {
        self.view_repo.as_ref()
    }

    // === Collaborators ===

    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    pub fn asset_store(&self) -> &dyn AssetStore {
        self.asset_store.as_ref()
    }

    /// Public URL of a stored asset
    pub fn asset_url(&self, asset: Option<&AssetRef>) -> Option<String> {
        asset.map(|a| self.asset_store.url_for(a))
    }

    /// Delete an asset that is no longer referenced. Failures are logged and
    /// swallowed: the mutation that orphaned the asset has already committed.
    pub async fn release_asset(&self, asset: &AssetRef) {
        if let Err(e) = self.asset_store.delete(asset).await {
            warn!(asset = %asset, error = %e, "Failed to release asset");
        }
    }

    // === Auth ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("session_store", &"...")
            .field("asset_store", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    follow_repo: Option<Arc<dyn FollowRepository>>,
    category_repo: Option<Arc<dyn CategoryRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    view_repo: Option<Arc<dyn ViewRepository>>,
    session_store: Option<Arc<dyn SessionStore>>,
    asset_store: Option<Arc<dyn AssetStore>>,
    jwt_service: Option<Arc<JwtService>>,
    password_service: Option<PasswordService>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn follow_repo(mut self, repo: Arc<dyn FollowRepository>) -> Self {
        self.follow_repo = Some(repo);
        self
    }

    pub fn category_repo(mut self, repo: Arc<dyn CategoryRepository>) -> Self {
        self.category_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn view_repo(mut self, repo: Arc<dyn ViewRepository>) -> Self {
        self.view_repo = Some(repo);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn asset_store(mut self, store: Arc<dyn AssetStore>) -> Self {
        self.asset_store = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn password_service(mut self, service: PasswordService) -> Self {
        self.password_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` naming the first missing dependency
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            profile_repo: required(self.profile_repo, "profile_repo")?,
            follow_repo: required(self.follow_repo, "follow_repo")?,
            category_repo: required(self.category_repo, "category_repo")?,
            post_repo: required(self.post_repo, "post_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            view_repo: required(self.view_repo, "view_repo")?,
            session_store: required(self.session_store, "session_store")?,
            asset_store: required(self.asset_store, "asset_store")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            password_service: self.password_service.unwrap_or_default(),
        })
    }
}

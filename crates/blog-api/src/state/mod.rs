//! Application state
//!
//! Holds the shared state for the Axum application: the service context, the
//! page renderer, the raw pools used by readiness checks, and configuration.

use std::sync::Arc;

use blog_cache::SharedRedisPool;
use blog_common::{AppConfig, JwtService};
use blog_db::PgPool;
use blog_service::ServiceContext;

use crate::render::PageRenderer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    renderer: Arc<dyn PageRenderer>,
    db_pool: PgPool,
    redis_pool: SharedRedisPool,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        service_context: ServiceContext,
        renderer: Arc<dyn PageRenderer>,
        db_pool: PgPool,
        redis_pool: SharedRedisPool,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            renderer,
            db_pool,
            redis_pool,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn renderer(&self) -> &dyn PageRenderer {
        self.renderer.as_ref()
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }

    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    /// Whether cookies should carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.app.env.is_production()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .finish()
    }
}

//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use blog_cache::{RedisPool, RedisSessionStore};
use blog_common::{AppConfig, AppError, JwtService, LocalAssetStore};
use blog_db::{
    create_pool, run_migrations, PgCategoryRepository, PgCommentRepository, PgFollowRepository,
    PgPool, PgPostRepository, PgProfileRepository, PgUserRepository, PgViewRepository,
};
use blog_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::render::TeraRenderer;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let storage = &state.config().storage;
    let router = create_router(&storage.media_url, &storage.upload_dir);
    let router = apply_middleware(router, &state)?;
    Ok(router.merge(health_routes()).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&blog_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL ready");

    info!("Connecting to Redis...");
    let redis_pool = RedisPool::from_config(&config.redis)
        .map_err(|e| AppError::Cache(e.to_string()))?;
    let shared_redis = Arc::new(redis_pool.clone());
    info!("Redis pool created");

    tokio::fs::create_dir_all(&config.storage.upload_dir)
        .await
        .map_err(|e| AppError::Storage(format!("cannot create upload dir: {e}")))?;

    assemble_state(config, pool, redis_pool)
}

/// Wire repositories, stores and the renderer over already-created pools
pub fn assemble_state(config: AppConfig, pool: PgPool, redis_pool: RedisPool) -> Result<AppState, AppError> {
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let shared_redis = Arc::new(redis_pool.clone());

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .profile_repo(Arc::new(PgProfileRepository::new(pool.clone())))
        .follow_repo(Arc::new(PgFollowRepository::new(pool.clone())))
        .category_repo(Arc::new(PgCategoryRepository::new(pool.clone())))
        .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .view_repo(Arc::new(PgViewRepository::new(pool.clone())))
        .session_store(Arc::new(RedisSessionStore::new(redis_pool)))
        .asset_store(Arc::new(LocalAssetStore::from_config(&config.storage)))
        .jwt_service(jwt_service)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let renderer = Arc::new(TeraRenderer::new()?);

    Ok(AppState::new(service_context, renderer, pool, shared_redis, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let state = create_app_state(config).await?;
    let app = create_app(state)?;
    run_server(app, &addr).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use std::collections::HashMap;
    use tower::ServiceExt;

    /// An app whose pools never connect unless a handler touches them
    fn offline_app() -> Router {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost:1/inkwell_offline"),
            ("REDIS_URL", "redis://localhost:1"),
            ("JWT_SECRET", "offline-secret"),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
        let pool = PgPool::connect_lazy(&config.database.url).unwrap();
        let redis_pool = RedisPool::from_config(&config.redis).unwrap();
        create_app(assemble_state(config, pool, redis_pool).unwrap()).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_served() {
        let response = offline_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_script_is_served_as_javascript() {
        let response = offline_app().oneshot(get("/static/blog.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/javascript"));
    }

    #[tokio::test]
    async fn test_login_page_renders_for_anonymous() {
        let response = offline_app().oneshot(get("/login")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_private_pages_redirect_anonymous_to_login() {
        for uri in ["/dashboard", "/post/create", "/profile/edit"] {
            let response = offline_app().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers()[header::LOCATION], "/login", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_ajax_requires_identity() {
        let request = Request::builder()
            .method("POST")
            .uri("/ajax/toggle-follow")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=alice"))
            .unwrap();
        let response = offline_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

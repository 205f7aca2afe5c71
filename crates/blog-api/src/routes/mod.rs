//! Route definitions
//!
//! Pages, ajax endpoints and auth live behind the full middleware stack;
//! health checks are mounted separately so rate limiting never hides them.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::handlers::{ajax, auth, health, pages, posts, profiles};
use crate::state::AppState;

/// Create the application router (health checks excluded)
pub fn create_router(media_url: &str, upload_dir: &str) -> Router<AppState> {
    let router = Router::new()
        .merge(page_routes())
        .merge(post_routes())
        .merge(auth_routes())
        .nest("/ajax", ajax_routes())
        .route("/static/blog.js", get(pages::blog_js));

    // Uploads behind an external media host are not served from here
    if media_url.starts_with('/') && media_url.len() > 1 {
        router.nest_service(media_url, ServeDir::new(upload_dir))
    } else {
        router
    }
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/search", get(pages::search))
        .route("/dashboard", get(pages::dashboard))
        .route("/author/:username", get(profiles::author))
        .route("/profile/edit", get(profiles::edit_form).post(profiles::edit))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/post/create", get(posts::create_form).post(posts::create))
        .route("/post/:slug", get(posts::detail))
        .route("/post/:slug/edit", get(posts::edit_form).post(posts::edit))
        .route("/post/:slug/delete", get(posts::delete_confirm).post(posts::delete))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh_token))
}

fn ajax_routes() -> Router<AppState> {
    Router::new()
        .route("/toggle-follow", post(ajax::toggle_follow))
        .route("/post-view", post(ajax::post_view))
        .route("/add-comment/:slug", post(ajax::add_comment))
}

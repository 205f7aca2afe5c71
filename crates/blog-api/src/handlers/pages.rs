//! Listing pages: home, search and the author dashboard

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use blog_service::dto::ListPostsQuery;
use blog_service::{DashboardService, PostService};

use super::{context_of, render_page};
use crate::extractors::OptionalAuthUser;
use crate::render::BLOG_JS;
use crate::response::PageResult;
use crate::state::AppState;

/// GET /
pub async fn home(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Query(query): Query<ListPostsQuery>,
) -> PageResult<Html<String>> {
    let home = PostService::new(state.service_context()).home(&query).await?;
    render_page(&state, "home.html", &viewer, context_of(&home)?)
}

/// GET /search
pub async fn search(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Query(query): Query<ListPostsQuery>,
) -> PageResult<Html<String>> {
    let results = PostService::new(state.service_context()).home(&query).await?;
    render_page(&state, "search.html", &viewer, context_of(&results)?)
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
) -> PageResult<Html<String>> {
    let overview = DashboardService::new(state.service_context())
        .overview(viewer.id())
        .await?;
    render_page(&state, "dashboard.html", &viewer, context_of(&overview)?)
}

/// GET /static/blog.js
pub async fn blog_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        BLOG_JS,
    )
}

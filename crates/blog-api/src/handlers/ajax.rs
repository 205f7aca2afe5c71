//! Ajax endpoints used by the pages' script
//!
//! Urlencoded bodies in, JSON out. Failures answer `{"error", "code"}`.

use axum::{
    extract::{Path, State},
    Json,
};
use blog_service::dto::{
    AddCommentRequest, AddCommentResponse, PostViewRequest, PostViewResponse, ToggleFollowRequest,
    ToggleFollowResponse,
};
use blog_service::{CommentService, FollowService, ServiceError, ViewService};
use uuid::Uuid;

use crate::extractors::{ClientIp, OptionalAuthUser, ValidatedForm};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Identity is checked before the body so anonymous callers always get 403
fn require_identity(viewer: &OptionalAuthUser) -> ApiResult<Uuid> {
    viewer.id().ok_or(ApiError::Service(ServiceError::Unauthenticated))
}

/// POST /ajax/toggle-follow
pub async fn toggle_follow(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    form: Result<ValidatedForm<ToggleFollowRequest>, ApiError>,
) -> ApiResult<Json<ToggleFollowResponse>> {
    let acting = require_identity(&viewer)?;
    let ValidatedForm(request) = form?;

    let response = FollowService::new(state.service_context())
        .toggle(Some(acting), &request.username)
        .await?;
    Ok(Json(response))
}

/// POST /ajax/post-view
pub async fn post_view(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    ClientIp(ip): ClientIp,
    ValidatedForm(request): ValidatedForm<PostViewRequest>,
) -> ApiResult<Json<PostViewResponse>> {
    let views = ViewService::new(state.service_context())
        .record(&request.slug, viewer.id(), ip)
        .await?;
    Ok(Json(PostViewResponse { views }))
}

/// POST /ajax/add-comment/:slug
pub async fn add_comment(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(slug): Path<String>,
    form: Result<ValidatedForm<AddCommentRequest>, ApiError>,
) -> ApiResult<Json<AddCommentResponse>> {
    let acting = require_identity(&viewer)?;
    let ValidatedForm(request) = form?;

    let response = CommentService::new(state.service_context())
        .add(Some(acting), &slug, request)
        .await?;
    Ok(Json(response))
}

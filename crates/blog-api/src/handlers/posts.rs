//! Post pages: detail, create, edit and delete

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use blog_core::DomainError;
use blog_service::dto::{ImageChange, PostFormRequest, PostResponse};
use blog_service::{CategoryService, PostService, ProfileService, ServiceError};
use serde_json::{json, Value};
use validator::Validate;

use super::{context_of, render_form, render_page};
use crate::extractors::{FormData, OptionalAuthUser};
use crate::response::{FormErrors, PageResult};
use crate::state::AppState;

const FEATURED_IMAGE_FIELD: &str = "featured_image";
const CLEAR_IMAGE_FIELD: &str = "clear_featured_image";

/// Submitted (or stored) values shown in the post form
fn form_values(request: &PostFormRequest, featured_image_url: Option<String>) -> Value {
    json!({
        "title": request.title,
        "content": request.content,
        "category": request.category.map(|id| id.to_string()).unwrap_or_default(),
        "new_category": request.new_category.clone().unwrap_or_default(),
        "published": request.published,
        "featured_image_url": featured_image_url,
    })
}

fn stored_values(post: &PostResponse) -> Value {
    let request = PostFormRequest {
        title: post.title.clone(),
        content: post.content.clone(),
        category: post.category.as_ref().map(|c| c.id),
        new_category: None,
        published: post.published,
    };
    form_values(&request, post.featured_image_url.clone())
}

async fn render_post_form(
    state: &AppState,
    viewer: &OptionalAuthUser,
    editing: Option<&str>,
    form: Value,
    errors: &FormErrors,
    status: StatusCode,
) -> PageResult<Response> {
    let categories = CategoryService::new(state.service_context()).list().await?;
    let context = json!({
        "editing": editing.is_some(),
        "slug": editing,
        "form": form,
        "categories": categories,
    });
    render_form(state, "post_form.html", viewer, context, errors, status)
}

/// Turn a failed save into a re-rendered form, or a page error
async fn rejected_post_form(
    state: &AppState,
    viewer: &OptionalAuthUser,
    editing: Option<&str>,
    form: Value,
    err: ServiceError,
) -> PageResult<Response> {
    match FormErrors::from_service(&err) {
        Some(errors) => {
            render_post_form(state, viewer, editing, form, &errors, StatusCode::BAD_REQUEST).await
        }
        None => Err(err.into()),
    }
}

/// GET /post/:slug
pub async fn detail(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(slug): Path<String>,
) -> PageResult<Html<String>> {
    let detail = PostService::new(state.service_context())
        .detail(&slug, viewer.id())
        .await?;
    render_page(&state, "post_detail.html", &viewer, context_of(&detail)?)
}

/// GET /post/create
pub async fn create_form(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
) -> PageResult<Response> {
    let own = ProfileService::new(state.service_context())
        .get_own(viewer.id())
        .await?;
    if !own.profile.is_author {
        return Err(DomainError::NotAuthor.into());
    }

    let form = form_values(&PostFormRequest::default(), None);
    render_post_form(&state, &viewer, None, form, &FormErrors::new(), StatusCode::OK).await
}

/// POST /post/create
pub async fn create(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    mut data: FormData,
) -> PageResult<Response> {
    let image = data.take_file(FEATURED_IMAGE_FIELD);
    let request: PostFormRequest = data.parse()?;
    let form = form_values(&request, None);

    if let Err(errors) = request.validate() {
        let errors = FormErrors::from(&errors);
        return render_post_form(&state, &viewer, None, form, &errors, StatusCode::BAD_REQUEST)
            .await;
    }

    match PostService::new(state.service_context())
        .create(viewer.id(), request, image)
        .await
    {
        Ok(post) => Ok(Redirect::to(&format!("/post/{}", post.slug)).into_response()),
        Err(e) => rejected_post_form(&state, &viewer, None, form, e).await,
    }
}

/// GET /post/:slug/edit
pub async fn edit_form(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(slug): Path<String>,
) -> PageResult<Response> {
    let posts = PostService::new(state.service_context());
    let post = posts.get_for_edit(viewer.id(), &slug).await?;
    let post = posts.to_response(&post).await?;

    render_post_form(
        &state,
        &viewer,
        Some(&slug),
        stored_values(&post),
        &FormErrors::new(),
        StatusCode::OK,
    )
    .await
}

/// POST /post/:slug/edit
pub async fn edit(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(slug): Path<String>,
    mut data: FormData,
) -> PageResult<Response> {
    let posts = PostService::new(state.service_context());
    let current = posts.get_for_edit(viewer.id(), &slug).await?;
    let current_image = state
        .service_context()
        .asset_url(current.featured_image.as_ref());

    let image = ImageChange::from_form(data.take_file(FEATURED_IMAGE_FIELD), data.checked(CLEAR_IMAGE_FIELD));
    let request: PostFormRequest = data.parse()?;
    let form = form_values(&request, current_image);

    if let Err(errors) = request.validate() {
        let errors = FormErrors::from(&errors);
        return render_post_form(&state, &viewer, Some(&slug), form, &errors, StatusCode::BAD_REQUEST)
            .await;
    }

    match posts.update(viewer.id(), &slug, request, image).await {
        Ok(post) => Ok(Redirect::to(&format!("/post/{}", post.slug)).into_response()),
        Err(e) => rejected_post_form(&state, &viewer, Some(&slug), form, e).await,
    }
}

/// GET /post/:slug/delete
pub async fn delete_confirm(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(slug): Path<String>,
) -> PageResult<Html<String>> {
    let posts = PostService::new(state.service_context());
    let post = posts.get_for_edit(viewer.id(), &slug).await?;
    let post = posts.to_response(&post).await?;
    render_page(&state, "post_confirm_delete.html", &viewer, json!({ "post": post }))
}

/// POST /post/:slug/delete
pub async fn delete(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(slug): Path<String>,
) -> PageResult<Redirect> {
    PostService::new(state.service_context())
        .delete(viewer.id(), &slug)
        .await?;
    Ok(Redirect::to("/"))
}

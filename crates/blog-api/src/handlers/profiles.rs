//! Author pages and profile editing

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use blog_service::dto::{ImageChange, ProfileResponse, UpdateProfileRequest};
use blog_service::ProfileService;
use serde_json::json;
use validator::Validate;

use super::{context_of, render_form, render_page};
use crate::extractors::{FormData, OptionalAuthUser};
use crate::response::{FormErrors, PageResult};
use crate::state::AppState;

fn render_profile_form(
    state: &AppState,
    viewer: &OptionalAuthUser,
    profile: &ProfileResponse,
    bio: &str,
    errors: &FormErrors,
    status: StatusCode,
) -> PageResult<Response> {
    let context = json!({
        "profile": profile,
        "form": { "bio": bio },
    });
    render_form(state, "profile_edit.html", viewer, context, errors, status)
}

/// GET /author/:username
pub async fn author(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(username): Path<String>,
) -> PageResult<Html<String>> {
    let page = ProfileService::new(state.service_context())
        .author_page(&username, viewer.id())
        .await?;
    render_page(&state, "author.html", &viewer, context_of(&page)?)
}

/// GET /profile/edit
pub async fn edit_form(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
) -> PageResult<Response> {
    let profiles = ProfileService::new(state.service_context());
    let own = profiles.get_own(viewer.id()).await?;
    let profile = profiles.to_response(&own);

    render_profile_form(&state, &viewer, &profile, &profile.bio, &FormErrors::new(), StatusCode::OK)
}

/// POST /profile/edit
pub async fn edit(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    mut data: FormData,
) -> PageResult<Response> {
    let profiles = ProfileService::new(state.service_context());
    let own = profiles.get_own(viewer.id()).await?;

    let avatar = ImageChange::from_form(data.take_file("avatar"), data.checked("clear_avatar"));
    let request: UpdateProfileRequest = data.parse()?;

    if let Err(errors) = request.validate() {
        let profile = profiles.to_response(&own);
        return render_profile_form(
            &state,
            &viewer,
            &profile,
            &request.bio,
            &FormErrors::from(&errors),
            StatusCode::BAD_REQUEST,
        );
    }

    let bio = request.bio.clone();
    match profiles.update_profile(viewer.id(), request, avatar).await {
        Ok(updated) => Ok(Redirect::to(&format!("/author/{}", updated.username)).into_response()),
        Err(e) => match FormErrors::from_service(&e) {
            Some(errors) => {
                let profile = profiles.to_response(&own);
                render_profile_form(&state, &viewer, &profile, &bio, &errors, StatusCode::BAD_REQUEST)
            }
            None => Err(e.into()),
        },
    }
}

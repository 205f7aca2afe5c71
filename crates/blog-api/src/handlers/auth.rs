//! Authentication handlers
//!
//! Signup and login pages set the session cookies; `/auth/refresh` serves
//! token clients with JSON.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use blog_common::AppError;
use blog_service::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, SignupRequest};
use blog_service::{AuthService, ServiceError};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use super::{render_form, safe_next};
use crate::cookies;
use crate::extractors::{FormData, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, FormErrors, PageResult};
use crate::state::AppState;

const AFTER_LOGIN: &str = "/dashboard";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn signup_values(request: Option<&SignupRequest>) -> Value {
    json!({
        "username": request.map(|r| r.username.as_str()).unwrap_or_default(),
        "email": request.map(|r| r.email.as_str()).unwrap_or_default(),
    })
}

fn login_values(request: Option<&LoginRequest>) -> Value {
    json!({ "login": request.map(|r| r.login.as_str()).unwrap_or_default() })
}

/// Cookies for the new session plus the redirect
fn signed_in(state: &AppState, jar: CookieJar, auth: &AuthResponse, next: Option<&str>) -> Response {
    let jar = cookies::with_session(jar, auth, state.secure_cookies());
    let target = safe_next(next).unwrap_or(AFTER_LOGIN);
    (jar, Redirect::to(target)).into_response()
}

/// GET /signup
pub async fn signup_form(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
) -> PageResult<Response> {
    if viewer.id().is_some() {
        return Ok(Redirect::to(AFTER_LOGIN).into_response());
    }
    let context = json!({ "form": signup_values(None) });
    render_form(&state, "signup.html", &viewer, context, &FormErrors::new(), StatusCode::OK)
}

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    jar: CookieJar,
    data: FormData,
) -> PageResult<Response> {
    let request: SignupRequest = data.parse()?;
    let context = json!({ "form": signup_values(Some(&request)) });

    if let Err(errors) = request.validate() {
        let errors = FormErrors::from(&errors);
        return render_form(&state, "signup.html", &viewer, context, &errors, StatusCode::BAD_REQUEST);
    }

    match AuthService::new(state.service_context()).signup(request).await {
        Ok(auth) => Ok(signed_in(&state, jar, &auth, None)),
        Err(e) => match FormErrors::from_service(&e) {
            Some(errors) => {
                render_form(&state, "signup.html", &viewer, context, &errors, StatusCode::BAD_REQUEST)
            }
            None => Err(e.into()),
        },
    }
}

/// GET /login
pub async fn login_form(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Query(query): Query<NextQuery>,
) -> PageResult<Response> {
    if viewer.id().is_some() {
        return Ok(Redirect::to(AFTER_LOGIN).into_response());
    }
    let context = json!({ "form": login_values(None), "next": query.next });
    render_form(&state, "login.html", &viewer, context, &FormErrors::new(), StatusCode::OK)
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    jar: CookieJar,
    Query(query): Query<NextQuery>,
    data: FormData,
) -> PageResult<Response> {
    let request: LoginRequest = data.parse()?;
    let context = json!({ "form": login_values(Some(&request)), "next": query.next });

    if let Err(errors) = request.validate() {
        let errors = FormErrors::from(&errors);
        return render_form(&state, "login.html", &viewer, context, &errors, StatusCode::BAD_REQUEST);
    }

    match AuthService::new(state.service_context()).login(request).await {
        Ok(auth) => Ok(signed_in(&state, jar, &auth, query.next.as_deref())),
        Err(ServiceError::App(AppError::InvalidCredentials)) => {
            let mut errors = FormErrors::new();
            errors.add_non_field("Invalid username/email or password");
            render_form(&state, "login.html", &viewer, context, &errors, StatusCode::FORBIDDEN)
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    jar: CookieJar,
) -> PageResult<Response> {
    if let Some(user) = viewer.user() {
        AuthService::new(state.service_context())
            .logout(user.session_id)
            .await?;
    }
    Ok((cookies::without_session(jar), Redirect::to("/login")).into_response())
}

/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = AuthService::new(state.service_context())
        .refresh(request)
        .await?;
    Ok(Json(response))
}

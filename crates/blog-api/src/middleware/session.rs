//! Transparent session renewal for browsers
//!
//! When the access cookie is missing or no longer valid but a refresh cookie
//! is present, the session is rotated before the request reaches a handler:
//! the request sees the new access token and the response sets both cookies.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use blog_service::dto::RefreshTokenRequest;
use blog_service::AuthService;
use tracing::{debug, warn};

use crate::cookies::{self, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::state::AppState;

pub async fn renew_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let has_bearer = request.headers().contains_key(header::AUTHORIZATION);
    let access_valid = jar
        .get(ACCESS_COOKIE)
        .is_some_and(|c| state.jwt_service().validate_access_token(c.value()).is_ok());
    let refresh_token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    let Some(refresh_token) = refresh_token.filter(|_| !has_bearer && !access_valid) else {
        return next.run(request).await;
    };

    let renewed = AuthService::new(state.service_context())
        .refresh(RefreshTokenRequest { refresh_token })
        .await;

    match renewed {
        Ok(auth) => {
            let jar = cookies::with_session(jar, &auth, state.secure_cookies());
            replace_cookie_header(&mut request, &jar);
            debug!(user_id = %auth.user.id, "Session renewed");
            let response = next.run(request).await;
            (jar, response).into_response()
        }
        Err(e) if e.status_code() != 403 => {
            warn!(error = %e, "Session renewal failed");
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Dropping unusable session cookies");
            let jar = cookies::without_session(jar);
            replace_cookie_header(&mut request, &jar);
            let response = next.run(request).await;
            (jar, response).into_response()
        }
    }
}

/// Make downstream extractors see the jar's current cookies
fn replace_cookie_header(request: &mut Request, jar: &CookieJar) {
    let cookie_header = jar
        .iter()
        .map(|c| format!("{}={}", c.name(), c.value()))
        .collect::<Vec<_>>()
        .join("; ");
    let headers = request.headers_mut();
    match HeaderValue::from_str(&cookie_header) {
        Ok(value) if !cookie_header.is_empty() => {
            headers.insert(header::COOKIE, value);
        }
        _ => {
            headers.remove(header::COOKIE);
        }
    }
}

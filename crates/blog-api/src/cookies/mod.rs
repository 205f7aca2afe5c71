//! Session cookies
//!
//! Browsers carry the token pair in two HttpOnly, SameSite=Lax cookies.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use blog_service::dto::AuthResponse;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Store a freshly issued token pair
///
/// Both are browser-session cookies; the tokens carry their own expiry.
pub fn with_session(jar: CookieJar, auth: &AuthResponse, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, auth.access_token.clone(), secure))
        .add(session_cookie(REFRESH_COOKIE, auth.refresh_token.clone(), secure))
}

/// Drop both session cookies
pub fn without_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE).path("/"))
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

//! Authentication extractors
//!
//! The access token comes from `Authorization: Bearer` or, for browsers, the
//! `access_token` cookie. A token only counts while its session is live.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use blog_service::dto::SessionUser;
use blog_service::AuthService;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::cookies::ACCESS_COOKIE;
use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user behind a live session
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    #[serde(skip)]
    pub session_id: Uuid,
}

impl From<SessionUser> for AuthUser {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            session_id: user.session_id,
        }
    }
}

/// Raw access token from the request, header first
async fn access_token<S>(parts: &mut Parts, state: &S) -> Option<String>
where
    S: Send + Sync,
{
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Authenticated user if any
///
/// A missing, expired or revoked token yields an anonymous caller rather
/// than an error. Infrastructure failures still reject the request.
#[derive(Debug, Clone, Default)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|user| user.id)
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = access_token(parts, state).await else {
            return Ok(Self(None));
        };

        let app_state = AppState::from_ref(state);
        match AuthService::new(app_state.service_context())
            .authenticate(&token)
            .await
        {
            Ok(user) => Ok(Self(Some(user.into()))),
            Err(e) if e.status_code() == 403 => {
                debug!(error = %e, "Ignoring stale access token");
                Ok(Self(None))
            }
            Err(e) => Err(e.into()),
        }
    }
}

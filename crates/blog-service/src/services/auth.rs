//! Authentication service
//!
//! Handles account creation, login, session refresh, logout, and resolving the
//! identity behind an access token.

use blog_common::auth::validate_password_strength;
use blog_common::AppError;
use blog_core::{DomainError, Profile, Session, User};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, RefreshTokenRequest, SessionUser,
    SignupRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account with its profile and log it in
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<AuthResponse> {
        let username = request.username.trim();
        let email = request.email.trim();

        if !User::is_valid_username(username) {
            return Err(DomainError::InvalidUsername(
                "use letters, digits and @.+-_ only".to_string(),
            )
            .into());
        }
        if !email.validate_email() {
            return Err(DomainError::InvalidEmail.into());
        }
        if request.password != request.password_confirm {
            return Err(ServiceError::validation("The two password fields didn't match"));
        }
        validate_password_strength(&request.password)?;

        // The unique constraints decide races; these only give the common case
        // a precise message before hashing
        if self.ctx.user_repo().username_exists(username).await? {
            return Err(DomainError::UsernameTaken.into());
        }
        if self.ctx.user_repo().email_exists(email).await? {
            return Err(DomainError::EmailTaken.into());
        }

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        let user = User::new(username.to_string(), email.to_string());
        let profile = Profile::for_new_user(user.id);
        self.ctx
            .user_repo()
            .create_with_profile(&user, &password_hash, &profile)
            .await?;

        info!(user_id = %user.id, "User signed up");

        self.open_session(&user).await
    }

    /// Log in with a username or email and a password
    #[instrument(skip(self, request), fields(login = %request.login))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let login = request.login.trim();

        let Some(user) = self.ctx.user_repo().find_by_login(login).await? else {
            warn!("Login failed: unknown user");
            return Err(AppError::InvalidCredentials.into());
        };

        let Some(password_hash) = self.ctx.user_repo().get_password_hash(user.id).await? else {
            warn!(user_id = %user.id, "Login failed: no password hash");
            return Err(AppError::InvalidCredentials.into());
        };

        if let Err(e) = self
            .ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
        {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(e.into());
        }

        info!(user_id = %user.id, "User logged in");

        self.open_session(&user).await
    }

    /// Exchange a refresh token of a live session for a new session and token pair
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;

        let session = self.live_session(claims.session_id(), claims.user_id()).await?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(session.user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        self.ctx.session_store().revoke(session.id).await?;

        info!(user_id = %user.id, "Session refreshed");

        self.open_session(&user).await
    }

    /// End a session; tokens carrying its id stop authenticating
    #[instrument(skip(self))]
    pub async fn logout(&self, session_id: Uuid) -> ServiceResult<()> {
        self.ctx.session_store().revoke(session_id).await?;
        info!(session_id = %session_id, "User logged out");
        Ok(())
    }

    /// End every session of a user
    #[instrument(skip(self))]
    pub async fn logout_everywhere(&self, user_id: Uuid) -> ServiceResult<u64> {
        let revoked = self.ctx.session_store().revoke_all_for_user(user_id).await?;
        info!(user_id = %user_id, revoked, "All sessions revoked");
        Ok(revoked)
    }

    /// Resolve an access token to the user of its still-live session
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<SessionUser> {
        let claims = self.ctx.jwt_service().validate_access_token(token)?;

        let session = self.live_session(claims.session_id(), claims.user_id()).await?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(session.user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(SessionUser {
            id: user.id,
            username: user.username,
            session_id: session.id,
        })
    }

    async fn live_session(&self, session_id: Uuid, user_id: Uuid) -> ServiceResult<Session> {
        self.ctx
            .session_store()
            .find(session_id)
            .await?
            .filter(|s| s.user_id == user_id && !s.is_expired())
            .ok_or_else(|| AppError::InvalidToken.into())
    }

    async fn open_session(&self, user: &User) -> ServiceResult<AuthResponse> {
        let jwt = self.ctx.jwt_service();
        let session = Session::new(user.id, jwt.refresh_token_expiry());
        self.ctx.session_store().create(&session).await?;

        let pair = jwt.generate_token_pair(user.id, session.id)?;

        Ok(AuthResponse::new(
            pair.access_token,
            pair.refresh_token,
            pair.expires_in,
            CurrentUserResponse::from(user),
        ))
    }
}

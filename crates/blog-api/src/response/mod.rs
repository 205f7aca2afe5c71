//! Response types and error handling
//!
//! JSON endpoints answer failures with `{"error": message, "code": CODE}`.
//! HTML endpoints use [`PageError`], which redirects anonymous callers to the
//! login page and otherwise leaves an [`ErrorPage`] marker for the error-page
//! middleware to render.

mod forms;

pub use forms::FormErrors;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use blog_common::{AppError, ErrorResponse};
use blog_core::DomainError;
use blog_service::ServiceError;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request: {0}")]
    InvalidBody(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            Self::App(e) => e.status_code(),
            Self::Service(e) => e.status_code(),
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_authorization() || e.is_authentication() {
                    403
                } else if e.is_validation() {
                    400
                } else {
                    500
                }
            }
            Self::Validation(_) | Self::InvalidBody(_) => 400,
            Self::Internal(_) => 500,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidBody(_) => "INVALID_REQUEST",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller failed to identify itself (as opposed to lacking rights)
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            Self::Service(ServiceError::Unauthenticated) => true,
            Self::Service(ServiceError::App(e)) | Self::App(e) => matches!(
                e,
                AppError::MissingAuth | AppError::InvalidToken | AppError::TokenExpired
            ),
            Self::Service(ServiceError::Domain(e)) | Self::Domain(e) => e.is_authentication(),
            _ => false,
        }
    }

    /// Message safe to show to the client
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            return "Internal server error".to_string();
        }
        match self {
            Self::Validation(errors) => FormErrors::from(errors).summary(),
            _ => self.to_string(),
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }

    fn log(&self) {
        if self.status_code().is_server_error() {
            error!(error = ?self, "Server error occurred");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = ErrorResponse::new(self.error_code(), self.public_message());
        (status, Json(body)).into_response()
    }
}

/// Type alias for JSON endpoint results
pub type ApiResult<T> = Result<T, ApiError>;

/// Marker left on HTML error responses; the error-page middleware renders it
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub message: String,
}

/// Error returned by HTML page handlers
#[derive(Debug)]
pub struct PageError(pub ApiError);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_unauthenticated() {
            return Redirect::to("/login").into_response();
        }

        err.log();
        let status = err.status_code();
        let message = err.public_message();
        let mut response = (status, message.clone()).into_response();
        response.extensions_mut().insert(ErrorPage { status, message });
        response
    }
}

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<ServiceError> for PageError {
    fn from(err: ServiceError) -> Self {
        Self(err.into())
    }
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err.into())
    }
}

impl From<DomainError> for PageError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

/// Type alias for HTML page results
pub type PageResult<T> = Result<T, PageError>;

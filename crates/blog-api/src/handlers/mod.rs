//! Route handlers
//!
//! Page handlers render templates and answer failures with [`PageError`];
//! ajax and token handlers answer JSON.

pub mod ajax;
pub mod auth;
pub mod health;
pub mod pages;
pub mod posts;
pub mod profiles;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::extractors::OptionalAuthUser;
use crate::response::{ApiError, FormErrors, PageError, PageResult};
use crate::state::AppState;

/// Serialize a response DTO into a template context
pub(crate) fn context_of<T: Serialize>(value: &T) -> PageResult<Value> {
    serde_json::to_value(value).map_err(|e| PageError(ApiError::internal(e)))
}

/// Render a page, exposing the viewer to the layout as `user`
pub(crate) fn render_page(
    state: &AppState,
    template: &str,
    viewer: &OptionalAuthUser,
    mut context: Value,
) -> PageResult<Html<String>> {
    if let Value::Object(map) = &mut context {
        map.insert("user".to_string(), context_of(&viewer.user())?);
    }
    let html = state.renderer().render(template, &context)?;
    Ok(Html(html))
}

/// Re-render a form with its submitted values and error messages
pub(crate) fn render_form(
    state: &AppState,
    template: &str,
    viewer: &OptionalAuthUser,
    mut context: Value,
    errors: &FormErrors,
    status: StatusCode,
) -> PageResult<Response> {
    if let Value::Object(map) = &mut context {
        map.insert("errors".to_string(), context_of(errors)?);
    }
    let html = render_page(state, template, viewer, context)?;
    Ok((status, html).into_response())
}

/// Only same-site paths are followed after login
pub(crate) fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
}

//! Renders HTML error pages for responses marked with [`ErrorPage`]

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::extractors::OptionalAuthUser;
use crate::response::ErrorPage;
use crate::state::AppState;

pub async fn render_error_pages(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let headers = request.headers().clone();
    let response = next.run(request).await;
    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    // Identify the viewer only when a page is actually rendered
    let mut parts = Request::new(()).into_parts().0;
    parts.headers = headers;
    let viewer = OptionalAuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_or_default();

    let context = json!({
        "user": viewer.user(),
        "status": page.status.as_u16(),
        "message": page.message,
    });
    match state.renderer().render("error.html", &context) {
        Ok(html) => (page.status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render error page");
            response
        }
    }
}

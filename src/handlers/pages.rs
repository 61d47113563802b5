//! Page rendering.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::handlers::ApiResponse;

/// Landing page template.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate;

/// `GET /`
pub async fn index() -> Response {
    match IndexTemplate.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render landing page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure("Internal server error")),
            )
                .into_response()
        }
    }
}

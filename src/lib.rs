//! Contact-form backend for a personal portfolio site.
//!
//! Serves the landing page and a single `POST /api/contact` endpoint that
//! validates a submission and relays it as an email through the configured
//! SMTP relay.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod state;
pub mod validation;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/contact", post(handlers::contact::submit))
        .layer(cors());

    Router::new()
        .route("/", get(handlers::pages::index))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the API: the site's own local origins, form posts only.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:5000"),
            HeaderValue::from_static("http://127.0.0.1:5000"),
        ])
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

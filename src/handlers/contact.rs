//! Contact-form endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::error::ContactError;
use crate::handlers::ApiResponse;
use crate::state::AppState;

/// `POST /api/contact`
///
/// Runs the submission pipeline and maps its outcome onto the JSON
/// envelope: 200 on delivery, 400 on validation failure, 500 on relay
/// failure. A body that is not JSON at all is rejected before the
/// pipeline runs.
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse>, ContactError> {
    let Json(payload) = payload?;

    state.contact.submit(&payload).await?;

    Ok(Json(ApiResponse::success("Email sent successfully")))
}

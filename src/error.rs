//! Error taxonomy for the contact pipeline.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::handlers::ApiResponse;

/// Failure while talking to the SMTP relay.
///
/// Each variant carries the relay/transport detail verbatim; the `Display`
/// form is `<failure kind> - <detail>`, which is what ends up in the HTTP
/// error payload.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    /// The session could not be established or was lost (network, TLS).
    #[error("SmtpConnectionError - {0}")]
    Connection(String),
    /// The relay rejected the operator credentials.
    #[error("SmtpAuthenticationError - {0}")]
    Authentication(String),
    /// The relay refused or failed to accept the message.
    #[error("SmtpSendError - {0}")]
    Send(String),
}

/// Outcome of a contact-form submission, short of success.
#[derive(Debug, Error)]
pub enum ContactError {
    /// Body was not a JSON object.
    #[error("Malformed request body")]
    MalformedRequest,
    /// One of `name`, `email`, `subject`, `message` was absent.
    #[error("Missing required fields")]
    MissingFields,
    /// A field was present but blank after trimming.
    #[error("All fields must not be empty")]
    EmptyFields,
    /// The email field did not match the accepted pattern.
    #[error("Invalid email format")]
    InvalidEmail,
    /// The relay session failed; never retried, the caller must resubmit.
    #[error(transparent)]
    Delivery(#[from] RelayError),
}

impl ContactError {
    /// HTTP status this error maps to at the handler boundary.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest
            | Self::MissingFields
            | Self::EmptyFields
            | Self::InvalidEmail => StatusCode::BAD_REQUEST,
            Self::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ContactError {
    fn from(_: JsonRejection) -> Self {
        Self::MalformedRequest
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "contact submission failed");
        } else {
            tracing::warn!(error = %self, "contact submission rejected");
        }
        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the only place where failures become HTTP status
//! codes. Lower layers return their own typed errors and the handlers
//! convert at the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Message returned for a missing or blank question.
pub const INVALID_QUESTION_MESSAGE: &str = "Pergunta inválida";

/// Message returned when the model provider fails.
pub const UPSTREAM_FAILURE_MESSAGE: &str =
    "Desculpe, estou tendo problemas técnicos. Tente novamente mais tarde!";

/// Message returned to a request from a disallowed origin.
pub const ACCESS_DENIED_MESSAGE: &str = "Origem não permitida";

/// JSON error body.
///
/// ```json
/// { "error": "Pergunta inválida" }
/// ```
///
/// `details` is only present for upstream failures outside production.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Client-facing message.
    pub error: String,
    /// Diagnostic detail, omitted in production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant           | HTTP Status               |
/// |-------------------|---------------------------|
/// | `InvalidInput`    | 400 Bad Request           |
/// | `AccessDenied`    | 403 Forbidden             |
/// | `UpstreamFailure` | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The client sent an unusable request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request's `Origin` is not on the allow-list.
    #[error("origin not allowed")]
    AccessDenied,

    /// The model provider failed. `details` is already filtered for the
    /// deployment mode.
    #[error("upstream failure")]
    UpstreamFailure {
        /// Diagnostic detail to expose, if any.
        details: Option<String>,
    },
}

impl GatewayError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::UpstreamFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its response body.
    #[must_use]
    pub fn to_body(&self) -> ErrorResponse {
        match self {
            Self::InvalidInput(_) => ErrorResponse {
                error: INVALID_QUESTION_MESSAGE.to_string(),
                details: None,
            },
            Self::AccessDenied => ErrorResponse {
                error: ACCESS_DENIED_MESSAGE.to_string(),
                details: None,
            },
            Self::UpstreamFailure { details } => ErrorResponse {
                error: UPSTREAM_FAILURE_MESSAGE.to_string(),
                details: details.clone(),
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = axum::Json(self.to_body()).into_response();
        *response.status_mut() = status;
        response
    }
}

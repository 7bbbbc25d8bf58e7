//! Origin allow-list and the middleware that enforces it.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::GatewayError;

/// Set of browser origins allowed to call the HTTP API.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    allowed: Arc<HashSet<String>>,
}

impl OriginPolicy {
    /// Creates a policy from exact origin strings (scheme, host, port).
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: Arc::new(origins.into_iter().map(Into::into).collect()),
        }
    }

    /// Decides admission for a request's `Origin` header value.
    ///
    /// Requests without an origin (non-browser clients) are admitted.
    #[must_use]
    pub fn admits(&self, origin: Option<&str>) -> bool {
        origin.is_none_or(|o| self.allowed.contains(o))
    }

    /// Returns the allowed origins, in no particular order.
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}

/// Middleware rejecting requests whose `Origin` is not allowed.
///
/// An `Origin` header that is not valid visible ASCII is treated as
/// disallowed.
pub async fn enforce_origin(
    State(policy): State<OriginPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(ORIGIN).map(|v| v.to_str());
    let admitted = match origin {
        None => true,
        Some(Ok(value)) => policy.admits(Some(value)),
        Some(Err(_)) => false,
    };

    if admitted {
        next.run(request).await
    } else {
        tracing::warn!(
            origin = ?request.headers().get(ORIGIN),
            method = %request.method(),
            path = %request.uri().path(),
            "rejected request from disallowed origin"
        );
        GatewayError::AccessDenied.into_response()
    }
}

/// Builds the CORS layer for the allowed origins, with credentials.
#[must_use]
pub fn cors_layer(policy: &OriginPolicy) -> CorsLayer {
    let origins: Vec<HeaderValue> = policy
        .origins()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = o, "ignoring unusable origin in allow-list");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

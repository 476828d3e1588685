//! API handlers.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

pub mod messages;
pub mod sse;
pub mod tools;

/// Answer for `HEAD` on GET-only routes.
///
/// axum serves `HEAD` with the GET handler unless one is registered, which
/// would open a session on `/sse` just to throw the body away.
pub async fn get_only() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, HeaderValue::from_static("GET"))],
    )
        .into_response()
}

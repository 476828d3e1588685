//! Response decoration and request logging.

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::net::SocketAddr;
use tracing::info;

use crate::error::ApiError;

/// Value of the `Server` header on every response.
pub const SERVER_HEADER: &str = "uvicorn";

/// Largest request body prefix written to the access log.
///
/// Longer bodies are still read in full and passed on untouched.
pub const MAX_LOGGED_BODY: usize = 2 * 1024 * 1024;

fn cors_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Authorization, Content-Type"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, GET, OPTIONS, PUT, DELETE"),
        ),
    ]
}

/// Add permissive CORS headers to every response and answer `OPTIONS` directly.
pub async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    for (name, value) in cors_headers() {
        headers.insert(name, value);
    }
    response
}

/// Emit one structured log line per request, body included.
pub async fn access_log(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return ApiError::UnreadableBody(e.to_string()).into_response(),
    };

    let remote_addr = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    info!(
        target: "access_log",
        timestamp = %chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        method = %parts.method,
        uri = %parts.uri,
        remote_addr = %remote_addr,
        headers = %headers_json(&parts.headers),
        body = %logged_body(&bytes),
        body_len = bytes.len(),
        "request"
    );

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Body text for the access log, cut at [`MAX_LOGGED_BODY`] bytes.
fn logged_body(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(&bytes[..bytes.len().min(MAX_LOGGED_BODY)])
}

/// Headers as a JSON object mapping each name to the list of its values.
fn headers_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();
    for name in headers.keys() {
        let values: Vec<Value> = headers
            .get_all(name)
            .iter()
            .map(|v| Value::String(String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        map.insert(name.as_str().to_string(), Value::Array(values));
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_json_groups_values() {
        let mut headers = HeaderMap::new();
        headers.append(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers.append(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::HOST, HeaderValue::from_static("localhost"));

        let value = headers_json(&headers);
        assert_eq!(
            value["accept"],
            serde_json::json!(["text/html", "application/json"])
        );
        assert_eq!(value["host"], serde_json::json!(["localhost"]));
    }

    #[test]
    fn test_logged_body_is_truncated() {
        assert_eq!(logged_body(b"{\"id\":1}"), "{\"id\":1}");

        let large = vec![b'x'; MAX_LOGGED_BODY + 10];
        assert_eq!(logged_body(&large).len(), MAX_LOGGED_BODY);
    }
}

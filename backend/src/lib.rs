//! mcp-time mock server library.
//!
//! This module exposes the application builder for use in tests.

use axum::http::{header, HeaderValue};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod mcp;
pub mod middleware;
pub mod openapi;
pub mod state;

use state::AppState;

/// Create the Axum application router with default state.
pub fn create_app() -> Router {
    create_app_with_state(AppState::default())
}

/// Create the Axum application router with a given state.
///
/// Layers, outermost first: access log, CORS (answers `OPTIONS` itself),
/// `Server` header.
pub fn create_app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // MCP over SSE
        .route("/sse", get(api::sse::sse_stream).head(api::get_only))
        .route(api::sse::MESSAGES_PATH, post(api::messages::post_message))
        .route("/messages", post(api::messages::post_message))
        // REST tool endpoints
        .route(
            "/openapi.json",
            get(api::tools::openapi_json).head(api::get_only),
        )
        .route("/get_current_time", post(api::tools::get_current_time))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::SERVER,
            HeaderValue::from_static(middleware::SERVER_HEADER),
        ))
        .layer(axum::middleware::from_fn(middleware::cors))
        .layer(axum::middleware::from_fn(middleware::access_log))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "OK"
}

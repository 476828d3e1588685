//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mcp_time_types::ErrorResponse;
use thiserror::Error;

/// Errors returned by the message endpoint before any reply work starts.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing session_id")]
    MissingSessionId,
    #[error("Session not found")]
    SessionNotFound,
    #[error("Invalid envelope")]
    InvalidEnvelope(#[source] serde_json::Error),
    #[error("Failed to read request body")]
    UnreadableBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingSessionId
            | ApiError::InvalidEnvelope(_)
            | ApiError::UnreadableBody(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::InvalidEnvelope(e) => {
                ErrorResponse::with_details(self.to_string(), e.to_string())
            }
            ApiError::UnreadableBody(details) => {
                ErrorResponse::with_details(self.to_string(), details.clone())
            }
            _ => ErrorResponse::new(self.to_string()),
        };
        (self.status(), Json(body)).into_response()
    }
}

//! REST endpoints of the time tool.

use axum::Json;
use mcp_time_types::TimeResponse;
use serde_json::Value;

/// GET /openapi.json - OpenAPI description of the tool endpoints.
pub async fn openapi_json() -> Json<Value> {
    Json(crate::openapi::document())
}

/// POST /get_current_time - Always answers with the same instant.
///
/// The request body is accepted as-is and ignored.
pub async fn get_current_time() -> Json<TimeResponse> {
    Json(TimeResponse::fixed())
}

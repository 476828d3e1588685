//! MCP message endpoint.
//!
//! Accepts JSON-RPC messages for an open session. The HTTP exchange ends
//! with `202 Accepted` as soon as the message is validated; the reply, if
//! any, arrives later on the session's SSE stream.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
};
use mcp_time_types::JsonRpcRequest;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters of the message endpoint.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub session_id: Option<String>,
}

/// POST /messages/?session_id=<id> - Submit a JSON-RPC message.
///
/// Checks run in order: session id present, session live, body parses.
pub async fn post_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), ApiError> {
    let session_id = query
        .session_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingSessionId)?;

    let slot = state
        .sessions()
        .lookup(&session_id)
        .ok_or(ApiError::SessionNotFound)?;

    let request: JsonRpcRequest =
        serde_json::from_slice(&body).map_err(ApiError::InvalidEnvelope)?;

    debug!(
        session_id = %session_id,
        method = %request.method,
        id = ?request.id,
        "MCP POST accepted"
    );

    state.dispatcher().spawn_reply(session_id, slot, request);

    Ok((StatusCode::ACCEPTED, "Accepted"))
}

//! JSON-RPC 2.0 envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version tag used when a request does not carry one.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request or notification as posted to the message endpoint.
///
/// The `id` is opaque: numbers, strings and any other JSON value are kept
/// exactly as received so they can be echoed back in the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Build a request with the given method and id.
    pub fn new(method: impl Into<String>, id: impl Into<Value>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: Some(id.into()),
            method: method.into(),
            params: None,
        }
    }

    /// Build a notification (no id).
    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    /// The version tag to echo back, defaulting to 2.0.
    pub fn version(&self) -> &str {
        self.jsonrpc.as_deref().unwrap_or(JSONRPC_VERSION)
    }
}

/// JSON-RPC 2.0 success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub result: Value,
}

impl JsonRpcResponse {
    /// Create a success response with an explicit id.
    pub fn success(id: impl Into<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            result,
        }
    }

    /// Create a success response answering `request`, echoing its version tag and id.
    pub fn reply_to(request: &JsonRpcRequest, result: Value) -> Self {
        Self {
            jsonrpc: request.version().to_string(),
            id: request.id.clone(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_keeps_string_id() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":"abc-1","method":"tools/list"}"#)
                .unwrap();
        assert_eq!(req.id, Some(json!("abc-1")));
        assert_eq!(req.method, "tools/list");
        assert!(req.params.is_none());
    }

    #[test]
    fn test_request_without_version_defaults() {
        let req: JsonRpcRequest = serde_json::from_str(r#"{"method":"ping"}"#).unwrap();
        assert_eq!(req.version(), "2.0");
        assert!(req.id.is_none());
    }

    #[test]
    fn test_request_requires_method() {
        assert!(serde_json::from_str::<JsonRpcRequest>(r#"{"id":1}"#).is_err());
        assert!(serde_json::from_str::<JsonRpcRequest>(r#"{"id":1,"method":7}"#).is_err());
    }

    #[test]
    fn test_reply_echoes_id_and_version() {
        let mut req = JsonRpcRequest::new("tools/call", 42);
        req.jsonrpc = Some("2.0-draft".to_string());
        let resp = JsonRpcResponse::reply_to(&req, json!({"ok": true}));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["jsonrpc"], "2.0-draft");
        assert_eq!(value["id"], 42);
        assert_eq!(value["result"]["ok"], true);
    }
}

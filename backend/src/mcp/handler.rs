//! MCP JSON-RPC responder.
//!
//! Every answer this server gives is canned: one tool, one fixed time
//! result. The stream and dispatch layers only see rendered payload strings.

use mcp_time_types::{
    JsonRpcRequest, JsonRpcResponse, TimeResponse, PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION,
};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

/// Name of the only tool this server exposes.
pub const TOOL_NAME: &str = "get_current_time";

/// How a JSON-RPC method is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// `initialize`; answered by the stream handshake, not per request.
    Initialize,
    /// The client's `initialized` notification.
    Initialized,
    /// `tools/list`
    ListTools,
    /// `tools/call`
    CallTool,
    /// Anything else.
    Unknown,
}

impl MethodKind {
    pub fn classify(method: &str) -> Self {
        match method {
            "initialize" => MethodKind::Initialize,
            "notifications/initialized" | "initialized" => MethodKind::Initialized,
            "tools/list" => MethodKind::ListTools,
            "tools/call" => MethodKind::CallTool,
            _ => MethodKind::Unknown,
        }
    }
}

/// Source of reply payloads for dispatched commands.
pub trait Responder: Send + Sync {
    /// Render the reply for `request`, or `None` when nothing should be sent.
    fn respond(&self, request: &JsonRpcRequest) -> Option<String>;

    /// Payload of the synthetic initialize reply sent when a stream opens.
    fn initialize_reply(&self) -> String;
}

/// Responder serving the fixed mcp-time answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct McpHandler;

impl McpHandler {
    /// Result body of the initialize reply.
    pub fn initialize_result() -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "experimental": {},
                "prompts": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            }
        })
    }

    /// Result body of `tools/list`.
    pub fn list_tools_result() -> Value {
        json!({
            "tools": [
                {
                    "name": TOOL_NAME,
                    "description": "Get current time in a specific timezone",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "timezone": {
                                "type": "string",
                                "title": "Timezone",
                                "description": "timezone name"
                            }
                        },
                        "required": ["timezone"],
                        "title": "get_current_time_form_model"
                    }
                }
            ]
        })
    }

    /// Result body of `tools/call`. The arguments are not inspected.
    pub fn call_tool_result() -> Value {
        let time = TimeResponse::fixed();
        let text = serde_json::to_string(&time).unwrap_or_default();
        json!({
            "content": [
                { "type": "text", "text": text }
            ],
            "structuredContent": time,
            "isError": false
        })
    }

    fn render(response: &JsonRpcResponse) -> Option<String> {
        match serde_json::to_string(response) {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!("Failed to serialize MCP reply: {}", e);
                None
            }
        }
    }
}

impl Responder for McpHandler {
    fn respond(&self, request: &JsonRpcRequest) -> Option<String> {
        let kind = MethodKind::classify(&request.method);
        debug!(method = %request.method, ?kind, "MCP: Handling method");

        let result = match kind {
            MethodKind::Initialize | MethodKind::Initialized => return None,
            MethodKind::ListTools => Self::list_tools_result(),
            MethodKind::CallTool => Self::call_tool_result(),
            MethodKind::Unknown => {
                warn!(method = %request.method, "MCP: Unknown method, dropping");
                return None;
            }
        };

        Self::render(&JsonRpcResponse::reply_to(request, result))
    }

    fn initialize_reply(&self) -> String {
        Self::render(&JsonRpcResponse::success(0, Self::initialize_result())).unwrap_or_default()
    }
}

//! Shared wire types for the mcp-time mock server.
//!
//! JSON-RPC envelopes exchanged over the SSE transport, plus the plain
//! HTTP response bodies served by the REST side of the server.

/// Default port for the mock server.
pub const DEFAULT_PORT: u16 = 8000;

/// MCP protocol revision announced in the initialize result.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported to MCP clients and in the OpenAPI document.
pub const SERVER_NAME: &str = "mcp-time";

/// Server version reported to MCP clients and in the OpenAPI document.
pub const SERVER_VERSION: &str = "1.13.1";

pub mod api;
pub mod jsonrpc;

pub use api::{ErrorResponse, TimeResponse};
pub use jsonrpc::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};

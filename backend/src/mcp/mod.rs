//! MCP (Model Context Protocol) over the HTTP+SSE transport.
//!
//! ## Endpoints
//!
//! - `GET /sse` - Open the event stream; creates the session
//! - `POST /messages/?session_id=<id>` - Submit a JSON-RPC message
//!
//! ## Session Management
//!
//! A session lives exactly as long as its SSE stream. Replies to posted
//! messages are computed in the background and pushed onto the stream
//! through a single-message slot.

pub mod dispatch;
pub mod handler;
pub mod session;

pub use dispatch::{Delivery, Dispatcher, DropReason};
pub use handler::{McpHandler, Responder};
pub use session::{McpSessionManager, SessionEvent, SessionGuard, SessionId};

//! Application state management.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::api::sse::MESSAGES_PATH;
use crate::config::Config;
use crate::mcp::dispatch::DEFAULT_REPLY_TIMEOUT;
use crate::mcp::{Dispatcher, McpHandler, McpSessionManager, Responder};

/// Default interval between SSE keep-alive comments.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Live MCP sessions
    sessions: McpSessionManager,
    /// Spawns reply workers for posted messages
    dispatcher: Dispatcher,
    /// Prefix put in front of the message path in the endpoint handshake
    public_url: String,
    /// Interval between SSE keep-alive comments
    keep_alive: Duration,
    /// Cancelled on shutdown so open streams end
    shutdown: CancellationToken,
}

impl AppState {
    /// Create state around the given responder.
    pub fn new(
        responder: Arc<dyn Responder>,
        reply_timeout: Duration,
        keep_alive: Duration,
        public_url: Option<String>,
    ) -> Self {
        let public_url = public_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_default();

        Self {
            inner: Arc::new(AppStateInner {
                sessions: McpSessionManager::new(),
                dispatcher: Dispatcher::new(responder, reply_timeout),
                public_url,
                keep_alive,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Create state serving the fixed mcp-time answers with the given configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(McpHandler),
            config.reply_timeout,
            config.keep_alive,
            config.public_url.clone(),
        )
    }

    pub fn sessions(&self) -> &McpSessionManager {
        &self.inner.sessions
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn keep_alive(&self) -> Duration {
        self.inner.keep_alive
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown
    }

    /// URL of the message endpoint for `session_id`, as sent in the handshake.
    pub fn message_endpoint(&self, session_id: &str) -> String {
        format!(
            "{}{}?session_id={}",
            self.inner.public_url, MESSAGES_PATH, session_id
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Arc::new(McpHandler),
            DEFAULT_REPLY_TIMEOUT,
            DEFAULT_KEEP_ALIVE,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_endpoint_relative() {
        let state = AppState::default();
        assert_eq!(state.message_endpoint("abc"), "/messages/?session_id=abc");
    }

    #[test]
    fn test_message_endpoint_with_public_url() {
        let state = AppState::new(
            Arc::new(McpHandler),
            DEFAULT_REPLY_TIMEOUT,
            DEFAULT_KEEP_ALIVE,
            Some("http://localhost:8000/".to_string()),
        );
        assert_eq!(
            state.message_endpoint("abc"),
            "http://localhost:8000/messages/?session_id=abc"
        );
    }
}

//! MCP session management.
//!
//! A session exists for exactly as long as one SSE stream is open. Each
//! session owns a delivery slot: a capacity-one channel whose receiving half
//! is held by the stream handler, while reply workers send through a sender
//! looked up by session id.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Opaque session identifier handed to the client in the endpoint handshake.
pub type SessionId = String;

/// Number of undelivered messages a slot can hold.
pub const SLOT_CAPACITY: usize = 1;

/// Sending half of a session's delivery slot.
pub type SlotSender = mpsc::Sender<SessionEvent>;

/// Receiving half of a session's delivery slot, drained by the stream handler.
pub type SlotReceiver = mpsc::Receiver<SessionEvent>;

/// Events written to a session's SSE stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Handshake carrying the message endpoint URL for this session.
    Endpoint(String),
    /// A JSON-RPC message.
    Message(String),
}

impl SessionEvent {
    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Endpoint(_) => "endpoint",
            SessionEvent::Message(_) => "message",
        }
    }

    /// SSE data payload.
    pub fn data(&self) -> &str {
        match self {
            SessionEvent::Endpoint(data) | SessionEvent::Message(data) => data,
        }
    }
}

/// Registry of live MCP sessions.
///
/// The map lock is only held for the insert, lookup or removal itself and
/// never across a send or receive on a slot.
#[derive(Clone, Debug, Default)]
pub struct McpSessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SlotSender>>>,
}

impl McpSessionManager {
    /// Create an empty session registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session, returning its id and the receiving half of its slot.
    pub fn create_session(&self) -> (SessionId, SlotReceiver) {
        let (tx, rx) = mpsc::channel(SLOT_CAPACITY);

        let mut sessions = self.sessions.lock();
        let id = loop {
            let candidate = Uuid::new_v4().simple().to_string();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(id.clone(), tx);
        let active = sessions.len();
        drop(sessions);

        info!(session_id = %id, active, "Created MCP session");
        (id, rx)
    }

    /// Look up the delivery slot of a live session.
    pub fn lookup(&self, id: &str) -> Option<SlotSender> {
        self.sessions.lock().get(id).cloned()
    }

    /// Remove a session. Removing an unknown id is a no-op.
    pub fn terminate(&self, id: &str) -> bool {
        let removed = self.sessions.lock().remove(id).is_some();
        if removed {
            info!(session_id = %id, "Terminated MCP session");
        } else {
            debug!(session_id = %id, "MCP session already gone");
        }
        removed
    }

    /// Get the number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Tie the lifetime of session `id` to the returned guard.
    pub fn guard(&self, id: SessionId) -> SessionGuard {
        SessionGuard {
            id,
            sessions: self.clone(),
        }
    }
}

/// Removes its session from the registry when dropped.
///
/// The stream handler keeps one of these inside the response body, so the
/// session disappears on every exit path: client disconnect, shutdown or
/// the body simply being dropped.
#[derive(Debug)]
pub struct SessionGuard {
    id: SessionId,
    sessions: McpSessionManager,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.terminate(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sessions_have_distinct_ids() {
        let sessions = McpSessionManager::new();
        let (a, _rx_a) = sessions.create_session();
        let (b, _rx_b) = sessions.create_session();

        assert_ne!(a, b);
        assert_eq!(sessions.session_count(), 2);
        assert!(sessions.lookup(&a).is_some());
        assert!(sessions.lookup(&b).is_some());
    }

    #[test]
    fn test_lookup_unknown_session() {
        let sessions = McpSessionManager::new();
        assert!(sessions.lookup("does-not-exist").is_none());
    }

    #[test]
    fn test_terminate_is_idempotent() {
        let sessions = McpSessionManager::new();
        let (id, _rx) = sessions.create_session();

        assert!(sessions.terminate(&id));
        assert!(!sessions.terminate(&id));
        assert!(sessions.lookup(&id).is_none());
        assert_eq!(sessions.session_count(), 0);
    }

    #[test]
    fn test_guard_drop_removes_session() {
        let sessions = McpSessionManager::new();
        let (id, _rx) = sessions.create_session();

        let guard = sessions.guard(id.clone());
        assert!(sessions.lookup(&id).is_some());

        drop(guard);
        assert!(sessions.lookup(&id).is_none());
    }

    #[tokio::test]
    async fn test_slot_holds_one_message() {
        let sessions = McpSessionManager::new();
        let (id, mut rx) = sessions.create_session();
        let slot = sessions.lookup(&id).unwrap();

        slot.try_send(SessionEvent::Message("first".into())).unwrap();
        assert!(slot
            .try_send(SessionEvent::Message("second".into()))
            .is_err());

        assert_eq!(rx.recv().await, Some(SessionEvent::Message("first".into())));
        slot.try_send(SessionEvent::Message("second".into())).unwrap();
        assert_eq!(rx.recv().await, Some(SessionEvent::Message("second".into())));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(SessionEvent::Endpoint("/x".into()).name(), "endpoint");
        assert_eq!(SessionEvent::Message("{}".into()).name(), "message");
        assert_eq!(SessionEvent::Message("{}".into()).data(), "{}");
    }
}

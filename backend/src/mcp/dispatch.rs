//! Reply workers.
//!
//! A command accepted on the message endpoint is answered out of band: a
//! task renders the reply and hands it to the session's slot, waiting at
//! most the configured reply timeout. A reply that cannot be handed over in
//! time is dropped and logged, never queued or retried.

use mcp_time_types::JsonRpcRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::handler::Responder;
use super::session::{SessionEvent, SlotSender};

/// Default bound on how long a reply waits for slot capacity.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Why a reply never reached its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The slot stayed full for the whole reply timeout.
    TimedOut,
    /// The stream had already gone away.
    Disconnected,
}

/// Outcome of one reply worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The reply was placed into the session's slot.
    Delivered,
    /// The command does not produce a reply.
    NoReply,
    /// The reply was discarded.
    Dropped(DropReason),
}

/// Place `event` into `slot`, waiting at most `deadline` for capacity.
pub async fn deliver(slot: &SlotSender, event: SessionEvent, deadline: Duration) -> Delivery {
    match timeout(deadline, slot.send(event)).await {
        Ok(Ok(())) => Delivery::Delivered,
        Ok(Err(_)) => Delivery::Dropped(DropReason::Disconnected),
        Err(_) => Delivery::Dropped(DropReason::TimedOut),
    }
}

/// Spawns reply workers for accepted commands.
#[derive(Clone)]
pub struct Dispatcher {
    responder: Arc<dyn Responder>,
    reply_timeout: Duration,
}

impl Dispatcher {
    pub fn new(responder: Arc<dyn Responder>, reply_timeout: Duration) -> Self {
        Self {
            responder,
            reply_timeout,
        }
    }

    pub fn responder(&self) -> &dyn Responder {
        self.responder.as_ref()
    }

    /// Run the reply for `request` in its own task.
    ///
    /// The task outlives the HTTP exchange that accepted the command; the
    /// handle is only awaited by tests.
    pub fn spawn_reply(
        &self,
        session_id: String,
        slot: SlotSender,
        request: JsonRpcRequest,
    ) -> JoinHandle<Delivery> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.reply(&session_id, &slot, &request).await })
    }

    /// Render the reply for `request` and hand it to `slot`.
    pub async fn reply(
        &self,
        session_id: &str,
        slot: &SlotSender,
        request: &JsonRpcRequest,
    ) -> Delivery {
        let Some(payload) = self.responder.respond(request) else {
            return Delivery::NoReply;
        };

        let outcome = deliver(slot, SessionEvent::Message(payload), self.reply_timeout).await;
        match outcome {
            Delivery::Delivered => {
                debug!(session_id, method = %request.method, "MCP reply delivered");
            }
            Delivery::Dropped(reason) => {
                warn!(
                    session_id,
                    method = %request.method,
                    ?reason,
                    timeout_ms = self.reply_timeout.as_millis() as u64,
                    "MCP reply dropped"
                );
            }
            Delivery::NoReply => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::handler::McpHandler;
    use crate::mcp::session::McpSessionManager;
    use serde_json::Value;

    const SHORT: Duration = Duration::from_millis(100);

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(McpHandler), SHORT)
    }

    fn reply_id(event: SessionEvent) -> Value {
        let value: Value = serde_json::from_str(event.data()).unwrap();
        value["id"].clone()
    }

    #[tokio::test]
    async fn test_reply_is_delivered() {
        let sessions = McpSessionManager::new();
        let (id, mut rx) = sessions.create_session();
        let slot = sessions.lookup(&id).unwrap();

        let outcome = dispatcher()
            .spawn_reply(id, slot, JsonRpcRequest::new("tools/list", "req-1"))
            .await
            .unwrap();

        assert_eq!(outcome, Delivery::Delivered);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name(), "message");
        assert_eq!(reply_id(event), "req-1");
    }

    #[tokio::test]
    async fn test_notification_has_no_reply() {
        let sessions = McpSessionManager::new();
        let (id, mut rx) = sessions.create_session();
        let slot = sessions.lookup(&id).unwrap();

        let outcome = dispatcher()
            .spawn_reply(
                id,
                slot,
                JsonRpcRequest::notification("notifications/initialized"),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Delivery::NoReply);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unknown_method_is_dropped_silently() {
        let sessions = McpSessionManager::new();
        let (id, mut rx) = sessions.create_session();
        let slot = sessions.lookup(&id).unwrap();

        let outcome = dispatcher()
            .spawn_reply(id, slot, JsonRpcRequest::new("resources/list", 3))
            .await
            .unwrap();

        assert_eq!(outcome, Delivery::NoReply);
        assert!(tokio::time::timeout(SHORT * 2, rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_slot_times_out() {
        let sessions = McpSessionManager::new();
        let (id, mut rx) = sessions.create_session();
        let slot = sessions.lookup(&id).unwrap();
        let dispatcher = Dispatcher::new(Arc::new(McpHandler), DEFAULT_REPLY_TIMEOUT);

        let first = dispatcher
            .spawn_reply(id.clone(), slot.clone(), JsonRpcRequest::new("tools/list", 1))
            .await
            .unwrap();
        assert_eq!(first, Delivery::Delivered);

        let started = tokio::time::Instant::now();
        let second = dispatcher
            .spawn_reply(id, slot, JsonRpcRequest::new("tools/call", 2))
            .await
            .unwrap();

        assert_eq!(second, Delivery::Dropped(DropReason::TimedOut));
        assert!(started.elapsed() >= DEFAULT_REPLY_TIMEOUT);
        assert_eq!(reply_id(rx.recv().await.unwrap()), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replies_are_fifo_once_drained() {
        let sessions = McpSessionManager::new();
        let (id, mut rx) = sessions.create_session();
        let slot = sessions.lookup(&id).unwrap();
        let dispatcher = Dispatcher::new(Arc::new(McpHandler), DEFAULT_REPLY_TIMEOUT);

        let first = dispatcher.spawn_reply(
            id.clone(),
            slot.clone(),
            JsonRpcRequest::new("tools/list", "a"),
        );
        assert_eq!(first.await.unwrap(), Delivery::Delivered);

        let second = dispatcher.spawn_reply(id, slot, JsonRpcRequest::new("tools/call", "b"));

        // Still inside the reply timeout, the second worker waits on the full slot.
        tokio::time::sleep(DEFAULT_REPLY_TIMEOUT / 2).await;
        assert!(!second.is_finished());

        assert_eq!(reply_id(rx.recv().await.unwrap()), "a");
        assert_eq!(second.await.unwrap(), Delivery::Delivered);
        assert_eq!(reply_id(rx.recv().await.unwrap()), "b");
    }

    #[tokio::test]
    async fn test_disconnected_stream_drops_reply() {
        let sessions = McpSessionManager::new();
        let (id, rx) = sessions.create_session();
        let slot = sessions.lookup(&id).unwrap();

        drop(rx);
        sessions.terminate(&id);

        let outcome = dispatcher()
            .spawn_reply(id, slot, JsonRpcRequest::new("tools/call", 9))
            .await
            .unwrap();
        assert_eq!(outcome, Delivery::Dropped(DropReason::Disconnected));
    }
}

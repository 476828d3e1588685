//! Server-Sent Events endpoint carrying MCP replies.
//!
//! Opening the stream creates a session. The first two events are always the
//! endpoint handshake and a synthetic initialize result; after that the
//! stream forwards whatever lands in the session's slot until the client
//! goes away.

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::mcp::{SessionEvent, SessionGuard};
use crate::state::AppState;

/// Path of the message endpoint announced in the handshake.
pub const MESSAGES_PATH: &str = "/messages/";

impl From<SessionEvent> for Event {
    fn from(event: SessionEvent) -> Self {
        Event::default().event(event.name()).data(event.data())
    }
}

/// Event stream of one session; unregisters the session when dropped.
pub struct SessionStream {
    events: BoxStream<'static, Result<Event, Infallible>>,
    _guard: SessionGuard,
}

impl SessionStream {
    pub fn new(
        events: impl Stream<Item = SessionEvent> + Send + 'static,
        guard: SessionGuard,
    ) -> Self {
        Self {
            events: events.map(|event| Ok(Event::from(event))).boxed(),
            _guard: guard,
        }
    }
}

impl Stream for SessionStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_next_unpin(cx)
    }
}

/// GET /sse - Open an MCP event stream.
///
/// Example usage from a shell:
/// ```text
/// curl -N http://localhost:8000/sse
/// event: endpoint
/// data: /messages/?session_id=5f0c...
/// ```
pub async fn sse_stream(State(state): State<AppState>) -> Response {
    let sessions = state.sessions();
    let (session_id, slot) = sessions.create_session();
    let guard = sessions.guard(session_id.clone());

    info!(
        session_id = %session_id,
        active = sessions.session_count(),
        "MCP: SSE stream opened"
    );

    let handshake = [
        SessionEvent::Endpoint(state.message_endpoint(&session_id)),
        SessionEvent::Message(state.dispatcher().responder().initialize_reply()),
    ];
    let events = stream::iter(handshake)
        .chain(ReceiverStream::new(slot))
        .take_until(state.shutdown_token().clone().cancelled_owned());

    let sse = Sse::new(SessionStream::new(events, guard)).keep_alive(
        KeepAlive::new()
            .interval(state.keep_alive())
            .text("keep-alive"),
    );

    (
        [
            (
                HeaderName::from_static("x-accel-buffering"),
                HeaderValue::from_static("no"),
            ),
            (header::CONNECTION, HeaderValue::from_static("keep-alive")),
        ],
        sse,
    )
        .into_response()
}

//! Session loop - one per websocket peer, from registration to release.
//!
//! ```text
//! Connecting --register--> Active --close / read error / cancel--> Closing --> Closed
//!                            ^  |
//!                            +--+ valid frame dispatched, or bad frame answered
//! ```
//!
//! Bad input never ends a session: structurally broken frames get
//! "Invalid message format", and dispatch failures get their own notice.
//! Only transport problems move the session to `Closing`. Leaving `Closing`
//! always unregisters the connection and closes it, via [`SessionGuard`], so
//! the release also happens on panic and is safe to race with a broadcaster
//! pruning the same connection.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::broadcast::Broadcaster;
use super::connection::{Connection, Outbound};
use super::error::PushError;
use super::registry::ConnectionRegistry;
use crate::shared::messaging::{ErrorNotice, InboundFrame, MessageId};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closing,
    Closed,
}

/// What became of one inbound text frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Persisted and broadcast under this id
    Dispatched(MessageId),
    /// Not persisted; the notice goes back to the sender
    Rejected(ErrorNotice),
}

pub struct Session {
    conn: Arc<Connection>,
    broadcaster: Arc<Broadcaster>,
    state: SessionState,
}

impl Session {
    pub fn new(conn: Arc<Connection>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            conn,
            broadcaster,
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    /// Register the connection and start accepting frames
    pub fn activate(&mut self) {
        if self.state == SessionState::Connecting {
            self.broadcaster.registry().register(self.conn.clone());
            self.state = SessionState::Active;
        }
    }

    /// Parse and dispatch one text frame.
    pub async fn handle_text(&self, text: &str) -> FrameOutcome {
        let frame = match InboundFrame::parse(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(conn_id = %self.conn.id(), "[Realtime] Unparseable frame: {}", e);
                return FrameOutcome::Rejected(ErrorNotice::invalid_format());
            }
        };

        match self.broadcaster.dispatch(frame).await {
            Ok(message_id) => FrameOutcome::Dispatched(message_id),
            Err(e) => {
                tracing::warn!(conn_id = %self.conn.id(), "[Realtime] Frame rejected: {}", e);
                FrameOutcome::Rejected(e.notice())
            }
        }
    }

    /// Apply one inbound websocket message and return the resulting state.
    pub async fn handle_message(&mut self, msg: Message) -> SessionState {
        match msg {
            Message::Text(text) => {
                let outcome = self.handle_text(text.as_str()).await;
                self.settle(outcome);
            }
            Message::Binary(_) => self.settle(FrameOutcome::Rejected(ErrorNotice::invalid_format())),
            // Pings are answered by the websocket layer itself
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => {
                tracing::debug!(conn_id = %self.conn.id(), "[Realtime] Peer sent close");
                self.state = SessionState::Closing;
            }
        }
        self.state
    }

    /// [`Session::handle_message`], abandoned as soon as the connection is
    /// cancelled. A dispatch cut short may have persisted its message without
    /// broadcasting it; peers reconcile through the store.
    pub async fn handle_or_cancel(&mut self, msg: Message) -> SessionState {
        let cancel = self.conn.cancellation().clone();
        let cancelled = tokio::select! {
            _ = cancel.cancelled() => true,
            _ = self.handle_message(msg) => false,
        };
        if cancelled {
            tracing::debug!(conn_id = %self.conn.id(), "[Realtime] Frame abandoned on cancel");
            self.state = SessionState::Closing;
        }
        self.state
    }

    fn settle(&mut self, outcome: FrameOutcome) {
        if let FrameOutcome::Rejected(notice) = outcome {
            if let Err(e) = self.reply(&notice) {
                tracing::warn!(conn_id = %self.conn.id(), "[Realtime] Could not deliver error notice: {}", e);
                self.state = SessionState::Closing;
            }
        }
    }

    /// Queue a notice for this peer only
    fn reply(&self, notice: &ErrorNotice) -> Result<(), PushError> {
        match notice.to_json() {
            Ok(json) => self.conn.push(Outbound::from(json)),
            Err(e) => {
                tracing::error!("[Realtime] Failed to encode error notice: {}", e);
                Ok(())
            }
        }
    }

    /// Drive the session over `socket` until the peer leaves, a transport
    /// error occurs, or the connection is cancelled.
    pub async fn run(
        mut self,
        socket: WebSocket,
        outbound: mpsc::Receiver<Outbound>,
        write_timeout: Duration,
    ) -> SessionState {
        let conn = self.conn.clone();
        let guard = SessionGuard {
            conn: conn.clone(),
            registry: self.broadcaster.registry().clone(),
        };
        self.activate();
        tracing::info!(conn_id = %conn.id(), "[Realtime] Session started");

        let (sink, mut stream) = socket.split();
        let writer = tokio::spawn(write_loop(sink, outbound, conn.clone(), write_timeout));
        let cancel = conn.cancellation().clone();

        while self.state == SessionState::Active {
            let next = tokio::select! {
                _ = cancel.cancelled() => None,
                next = stream.next() => next,
            };
            match next {
                Some(Ok(msg)) => {
                    self.handle_or_cancel(msg).await;
                }
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn.id(), "[Realtime] Read failed: {}", e);
                    self.state = SessionState::Closing;
                }
                None => self.state = SessionState::Closing,
            }
        }

        drop(guard);
        if let Err(e) = writer.await {
            tracing::error!(conn_id = %conn.id(), "[Realtime] Writer task failed: {}", e);
        }
        self.state = SessionState::Closed;
        self.state
    }
}

/// Unregisters and closes its connection when dropped
pub struct SessionGuard {
    conn: Arc<Connection>,
    registry: Arc<ConnectionRegistry>,
}

impl SessionGuard {
    pub fn new(conn: Arc<Connection>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { conn, registry }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let removed = self.registry.unregister(self.conn.id());
        self.conn.close();
        tracing::info!(conn_id = %self.conn.id(), removed, "[Realtime] Session closed");
    }
}

/// Drain the outbound queue into the socket, one bounded write at a time.
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Outbound>,
    conn: Arc<Connection>,
    write_timeout: Duration,
) {
    let cancel = conn.cancellation().clone();
    loop {
        let payload = tokio::select! {
            _ = cancel.cancelled() => break,
            next = outbound.recv() => match next {
                Some(payload) => payload,
                None => break,
            },
        };

        match tokio::time::timeout(write_timeout, sink.send(Message::Text(payload))).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(conn_id = %conn.id(), "[Realtime] Write failed: {}", e);
                break;
            }
            Err(_) => {
                tracing::warn!(conn_id = %conn.id(), ?write_timeout, "[Realtime] Write timed out");
                break;
            }
        }
    }

    conn.close();
    let _ = tokio::time::timeout(write_timeout, sink.close()).await;
}

//! Realtime peer connection handle.
//!
//! A [`Connection`] is the shared half of one websocket peer: the sending end
//! of its bounded outbound queue and the token that stops its session. The
//! socket itself is owned by the session task; the registry and broadcaster
//! only hold `Arc<Connection>` and can never extend the socket's lifetime.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

use super::error::PushError;

/// Serialized JSON text queued for a peer. Cloning is cheap, so a broadcast
/// serializes once and shares the buffer across every queue.
pub type Outbound = Utf8Bytes;

/// Identity of a connection, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One connected realtime peer.
pub struct Connection {
    id: ConnectionId,
    tx: mpsc::Sender<Outbound>,
    cancel: CancellationToken,
    closed: AtomicBool,
    /// Pushes refused because the queue was full
    dropped: AtomicU64,
}

impl Connection {
    pub fn new(id: ConnectionId, tx: mpsc::Sender<Outbound>, cancel: CancellationToken) -> Self {
        Self {
            id,
            tx,
            cancel,
            closed: AtomicBool::new(false),
            dropped: AtomicU64::new(0),
        }
    }

    /// Create a connection together with the receiving end of its queue.
    pub fn channel(
        id: ConnectionId,
        capacity: usize,
        cancel: CancellationToken,
    ) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(id, tx, cancel), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a frame without waiting.
    pub fn push(&self, payload: Outbound) -> Result<(), PushError> {
        if self.is_closed() {
            return Err(PushError::Closed);
        }
        match self.tx.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(PushError::Full)
            }
            Err(TrySendError::Closed(_)) => Err(PushError::Closed),
        }
    }

    /// Stop the session and release the socket. Only the first call has any
    /// effect; returns whether this call was it.
    pub fn close(&self) -> bool {
        let first = !self.closed.swap(true, Ordering::AcqRel);
        if first {
            self.cancel.cancel();
        }
        first
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.cancel.is_cancelled()
    }

    /// Token cancelled when this connection is closed or the hub shuts down
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

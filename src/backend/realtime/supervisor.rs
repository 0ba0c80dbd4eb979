/**
 * Realtime Hub
 *
 * Owns everything the realtime path shares: the connection registry, the
 * broadcaster, and a root cancellation token that every connection's token
 * is derived from. Built once at startup and handed to the router.
 *
 * # Handshake
 *
 * `GET /ws` upgrades into a session. If the request is not a valid upgrade
 * the extractor rejection is returned as-is and nothing is registered. Each
 * successful upgrade runs exactly one session.
 *
 * # Shutdown
 *
 * `Hub::shutdown` cancels the root token, which stops every session, and
 * closes whatever is still registered. Handshakes arriving afterwards are
 * refused with 503.
 */

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::broadcast::Broadcaster;
use super::connection::{Connection, Outbound};
use super::registry::ConnectionRegistry;
use super::session::Session;
use crate::backend::messaging::store::MessageStore;
use crate::shared::config::AppConfig;

/// Realtime fan-out hub
pub struct Hub {
    registry: Arc<ConnectionRegistry>,
    broadcaster: Arc<Broadcaster>,
    shutdown: CancellationToken,
    outbound_buffer: usize,
    write_timeout: Duration,
    max_frame_bytes: usize,
}

impl Hub {
    pub fn new(store: Arc<dyn MessageStore>, config: &AppConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Arc::new(Broadcaster::new(registry.clone(), store));
        Self {
            registry,
            broadcaster,
            shutdown: CancellationToken::new(),
            outbound_buffer: config.outbound_buffer,
            write_timeout: config.write_timeout(),
            max_frame_bytes: config.max_frame_bytes,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Create a connection whose cancellation follows the hub's.
    pub fn open_connection(&self) -> (Arc<Connection>, mpsc::Receiver<Outbound>) {
        let (conn, rx) = Connection::channel(
            self.registry.allocate_id(),
            self.outbound_buffer,
            self.shutdown.child_token(),
        );
        (Arc::new(conn), rx)
    }

    /// Run one session over an upgraded socket until it ends.
    pub async fn serve(self: Arc<Self>, socket: WebSocket) {
        let (conn, outbound) = self.open_connection();
        let session = Session::new(conn, self.broadcaster.clone());
        session.run(socket, outbound, self.write_timeout).await;
    }

    /// Accept a handshake: upgrade and hand the socket to a new session.
    pub fn accept(self: Arc<Self>, upgrade: WebSocketUpgrade) -> Response {
        if self.is_shutting_down() {
            return (StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down").into_response();
        }

        upgrade
            .max_message_size(self.max_frame_bytes)
            .max_frame_size(self.max_frame_bytes)
            .on_failed_upgrade(|e| {
                tracing::warn!("[Realtime] Websocket upgrade failed: {}", e);
            })
            .on_upgrade(move |socket| self.serve(socket))
    }

    /// Stop every session and close all registered connections.
    pub fn shutdown(&self) -> usize {
        self.shutdown.cancel();
        let closed = self.registry.close_all();
        tracing::info!(closed, "[Realtime] Hub shut down");
        closed
    }
}

/// `GET /ws`
pub async fn ws_handler(
    State(hub): State<Arc<Hub>>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match upgrade {
        Ok(upgrade) => hub.accept(upgrade),
        Err(rejection) => {
            tracing::debug!("[Realtime] Rejected handshake: {}", rejection);
            rejection.into_response()
        }
    }
}

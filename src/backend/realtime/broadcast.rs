/**
 * Fan-out Broadcaster
 *
 * Persists each accepted frame and pushes the resulting record to every
 * registered connection.
 *
 * # Delivery
 *
 * Persistence and fan-out are decoupled: once `append` succeeds the message
 * id is returned to the caller no matter how many peers actually receive the
 * live push. Each push is a non-blocking `try_send` into the peer's bounded
 * queue. A peer that refuses (queue full, already closed) is unregistered and
 * closed on the spot; delivery to the remaining peers continues.
 *
 * Live delivery is best-effort. Anyone who missed a push reconciles through
 * `MessageStore::list_by_conversation`.
 *
 * # Audience
 *
 * Records go to every registered connection, including the sender's own and
 * connections with no stake in the conversation.
 */

use std::sync::Arc;

use super::connection::Outbound;
use super::error::DispatchError;
use super::registry::ConnectionRegistry;
use crate::backend::messaging::store::MessageStore;
use crate::shared::messaging::{BroadcastRecord, InboundFrame, MessageId};

/// Result of pushing one record to the registry's membership
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    /// Peers whose queue accepted the record
    pub delivered: usize,
    /// Peers removed because they could not accept it
    pub pruned: usize,
}

/// Persists inbound frames and fans the results out to all peers
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
    store: Arc<dyn MessageStore>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>, store: Arc<dyn MessageStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn MessageStore> {
        &self.store
    }

    /// Validate, persist, then fan out one frame.
    ///
    /// Invalid frames never reach the store. A missing conversation or any
    /// other store failure returns before the registry is touched.
    pub async fn dispatch(&self, frame: InboundFrame) -> Result<MessageId, DispatchError> {
        frame.validate().map_err(DispatchError::InvalidFrame)?;

        let message_id = self
            .store
            .append(frame.conversation_id, frame.sender_id, &frame.content)
            .await?;

        let record = BroadcastRecord::from_frame(message_id, frame);
        match record.to_json() {
            Ok(json) => {
                let report = self.fan_out(Outbound::from(json));
                tracing::info!(
                    message_id,
                    conversation_id = record.conversation_id,
                    sender_id = record.sender_id,
                    delivered = report.delivered,
                    pruned = report.pruned,
                    "[Realtime] Message broadcast"
                );
            }
            Err(e) => {
                tracing::error!(message_id, "[Realtime] Failed to encode broadcast record: {}", e);
            }
        }

        Ok(message_id)
    }

    /// Push a serialized record to every connection in a registry snapshot.
    pub fn fan_out(&self, payload: Outbound) -> FanOutReport {
        let mut report = FanOutReport::default();

        for conn in self.registry.snapshot() {
            match conn.push(payload.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    self.registry.unregister(conn.id());
                    conn.close();
                    report.pruned += 1;
                    tracing::warn!(conn_id = %conn.id(), "[Realtime] Pruned connection: {}", e);
                }
            }
        }

        report
    }
}

//! Connection registry
//!
//! The set of live realtime peers. One mutex guards the map and is held only
//! for the map operation itself: [`ConnectionRegistry::snapshot`] clones the
//! `Arc`s out and releases the lock before anyone iterates, so a slow peer
//! can never hold up a connect or disconnect.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::connection::{Connection, ConnectionId};

/// Registry of live connections, ordered by registration
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<BTreeMap<ConnectionId, Arc<Connection>>>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id. Ids increase monotonically and are never reused.
    pub fn allocate_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Add a connection. Each connection is registered exactly once by its
    /// session.
    pub fn register(&self, conn: Arc<Connection>) {
        let id = conn.id();
        if self.lock().insert(id, conn).is_some() {
            tracing::warn!(conn_id = %id, "[Realtime] Connection registered twice");
        }
    }

    /// Remove a connection. Returns `false` when it was already gone, which
    /// is expected when a broadcast pruned it first.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        self.lock().remove(&id).is_some()
    }

    /// Point-in-time membership, in registration order.
    pub fn snapshot(&self) -> Vec<Arc<Connection>> {
        self.lock().values().cloned().collect()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Empty the registry and close every connection it held. Returns how
    /// many were closed.
    pub fn close_all(&self) -> usize {
        let drained = std::mem::take(&mut *self.lock());
        for conn in drained.values() {
            conn.close();
        }
        drained.len()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ConnectionId, Arc<Connection>>> {
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

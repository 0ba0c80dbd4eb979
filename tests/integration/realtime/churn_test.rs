//! Registry membership under concurrent joins, leaves and broadcasts

use std::sync::Arc;

use instaspace::backend::messaging::InMemoryMessageStore;
use instaspace::backend::realtime::{Broadcaster, Connection, ConnectionRegistry};
use instaspace::shared::messaging::InboundFrame;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

const CHURN_TASKS: usize = 8;
const CHURN_ROUNDS: usize = 200;
const DISPATCH_TASKS: i64 = 4;
const DISPATCHES: usize = 50;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_churn_during_fan_out_leaves_registry_empty() {
    let registry = Arc::new(ConnectionRegistry::new());
    let store = Arc::new(InMemoryMessageStore::with_conversations(1));
    let broadcaster = Arc::new(Broadcaster::new(registry.clone(), store.clone()));

    let mut churners = Vec::new();
    for _ in 0..CHURN_TASKS {
        let registry = registry.clone();
        churners.push(tokio::spawn(async move {
            for _ in 0..CHURN_ROUNDS {
                let (conn, _rx) = Connection::channel(registry.allocate_id(), 2, CancellationToken::new());
                let conn = Arc::new(conn);
                registry.register(conn.clone());
                tokio::task::yield_now().await;

                // A broadcast may already have pruned it
                registry.unregister(conn.id());
                conn.close();
                assert!(!registry.contains(conn.id()));
            }
        }));
    }

    let mut dispatchers = Vec::new();
    for sender_id in 1..=DISPATCH_TASKS {
        let broadcaster = broadcaster.clone();
        dispatchers.push(tokio::spawn(async move {
            for i in 0..DISPATCHES {
                let frame = InboundFrame::new(1, sender_id, format!("m{}", i));
                broadcaster.dispatch(frame).await.unwrap();
                tokio::task::yield_now().await;
            }
        }));
    }

    for handle in churners.into_iter().chain(dispatchers) {
        handle.await.unwrap();
    }

    assert_eq!(registry.len(), 0);
    assert!(registry.snapshot().is_empty());
    assert_eq!(store.message_count(), DISPATCH_TASKS as usize * DISPATCHES);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ids_are_unique() {
    let registry = Arc::new(ConnectionRegistry::new());

    let mut handles = Vec::new();
    for _ in 0..CHURN_TASKS {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            (0..CHURN_ROUNDS)
                .map(|_| registry.allocate_id().get())
                .collect::<Vec<_>>()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.extend(handle.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), CHURN_TASKS * CHURN_ROUNDS);
}

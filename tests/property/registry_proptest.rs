//! Property-based tests for the connection registry and frame validation
//!
//! Uses proptest to drive random operation sequences against a simple model

use std::collections::BTreeSet;
use std::sync::Arc;

use instaspace::backend::realtime::{Connection, ConnectionId, ConnectionRegistry};
use instaspace::shared::messaging::InboundFrame;
use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
enum Op {
    Register,
    Unregister(usize),
    CloseAll,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Register),
        3 => (0usize..32).prop_map(Op::Unregister),
        1 => Just(Op::CloseAll),
    ]
}

proptest! {
    #[test]
    fn test_registry_matches_set_model(ops in prop::collection::vec(op(), 1..64)) {
        let registry = ConnectionRegistry::new();
        let mut model: BTreeSet<u64> = BTreeSet::new();
        let mut issued: Vec<ConnectionId> = Vec::new();
        let mut receivers = Vec::new();

        for op in ops {
            match op {
                Op::Register => {
                    let id = registry.allocate_id();
                    prop_assert!(!issued.contains(&id));
                    let (conn, rx) = Connection::channel(id, 4, CancellationToken::new());
                    registry.register(Arc::new(conn));
                    receivers.push(rx);
                    issued.push(id);
                    model.insert(id.get());
                }
                Op::Unregister(pick) => {
                    if issued.is_empty() {
                        continue;
                    }
                    let id = issued[pick % issued.len()];
                    prop_assert_eq!(registry.unregister(id), model.remove(&id.get()));
                }
                Op::CloseAll => {
                    let closed = registry.close_all();
                    prop_assert_eq!(closed, model.len());
                    model.clear();
                }
            }

            let mut seen: Vec<u64> = registry.snapshot().iter().map(|c| c.id().get()).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, model.iter().copied().collect::<Vec<_>>());
            prop_assert_eq!(registry.len(), model.len());
        }
    }

    #[test]
    fn test_validate_accepts_exactly_complete_frames(
        conversation_id in -3i64..3,
        sender_id in -3i64..3,
        content in ".{0,8}",
    ) {
        let frame = InboundFrame::new(conversation_id, sender_id, content.clone());
        let complete = conversation_id != 0 && sender_id != 0 && !content.is_empty();
        prop_assert_eq!(frame.validate().is_ok(), complete);
    }

    #[test]
    fn test_parse_never_panics(text in ".*") {
        let _ = InboundFrame::parse(&text);
    }
}

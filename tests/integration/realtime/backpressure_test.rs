//! A peer that stops reading is cut loose without holding up the others

use std::time::Duration;

use instaspace::shared::config::AppConfig;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

const PAYLOAD_BYTES: usize = 48 * 1024;
const MAX_MESSAGES: usize = 1000;
const TAIL_MESSAGES: usize = 20;

fn small_queue_config() -> AppConfig {
    AppConfig::builder()
        .jwt_secret(TEST_SECRET)
        .outbound_buffer(4)
        .write_timeout_ms(100)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_stalled_peer_is_pruned_while_others_keep_up() {
    let server = TestServer::start_with(small_queue_config()).await;
    let mut sender = server.connect().await;
    let mut reader = server.connect().await;
    // Never polled: its socket buffers fill, then its queue
    let _stalled = server.connect().await;

    let content = "x".repeat(PAYLOAD_BYTES);
    let mut sent = 0;
    let mut pruned_after = None;

    // Lockstep sends keep the readers' queues near empty
    while sent < MAX_MESSAGES {
        send_json(
            &mut sender,
            json!({"conversation_id": 1, "sender_id": 1, "content": content}),
        )
        .await;
        sent += 1;

        for peer in [&mut sender, &mut reader] {
            let record = recv_json(peer).await;
            assert_eq!(record["content"].as_str().map(str::len), Some(PAYLOAD_BYTES));
        }

        match pruned_after {
            None if server.connections() == 2 => pruned_after = Some(sent),
            Some(at) if sent >= at + TAIL_MESSAGES => break,
            _ => {}
        }
    }

    assert!(
        pruned_after.is_some(),
        "stalled peer still registered after {} messages",
        sent
    );
    assert_eq!(server.connections(), 2);
    assert_eq!(server.store.message_count(), sent);

    // The survivors still talk both ways
    send_json(&mut reader, json!({"conversation_id": 1, "sender_id": 2, "content": "done"})).await;
    assert_eq!(recv_json(&mut sender).await["content"], "done");
    assert_eq!(recv_json(&mut reader).await["content"], "done");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(server.connections(), 2);
}

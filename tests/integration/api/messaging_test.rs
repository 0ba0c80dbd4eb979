//! Auth and messaging routes driven through the router

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{Method, StatusCode},
    Router,
};
use instaspace::backend::auth::sessions::{create_token, TokenKind};
use instaspace::backend::messaging::InMemoryMessageStore;
use instaspace::backend::routes::create_router;
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

use crate::common::*;

fn app() -> (Router, Arc<InMemoryMessageStore>) {
    let (state, store) = test_state(1);
    (create_router(state), store)
}

#[tokio::test]
async fn test_health_reports_connection_count() {
    let (app, _) = app();
    let (status, body) = call(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "connections": 0}));
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, _) = app();
    let (status, body) = call(
        &app,
        request(Method::GET, "/api/conversations/1/messages", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_confirmation_token_is_not_an_access_token() {
    let (app, _) = app();
    let token = create_token(
        TEST_SECRET,
        1,
        "user@example.com",
        TokenKind::Confirmation,
        Duration::from_secs(3600),
    )
    .unwrap();

    let (status, _) = call(
        &app,
        request(Method::GET, "/api/conversations/1/messages", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_conversation_message_lifecycle() {
    let (app, store) = app();
    let token = access_token(7);

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/api/conversations",
            Some(&token),
            Some(json!({"user1_id": 7, "user2_id": 8})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let conversation_id = body["conversation_id"].as_i64().unwrap();

    // Same pair resolves to the same conversation
    let (_, again) = call(
        &app,
        request(
            Method::POST,
            "/api/conversations",
            Some(&token),
            Some(json!({"user1_id": 7, "user2_id": 8})),
        ),
    )
    .await;
    assert_eq!(again["conversation_id"].as_i64(), Some(conversation_id));

    let (status, sent) = call(
        &app,
        request(
            Method::POST,
            "/api/messages",
            Some(&token),
            Some(json!({"conversation_id": conversation_id, "sender_id": 7, "content": "hello"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let message_id = sent["message_id"].as_i64().unwrap();
    assert_eq!(store.message_count(), 1);

    let uri = format!("/api/conversations/{}/messages", conversation_id);
    let (status, listed) = call(&app, request(Method::GET, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let messages = listed["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["id"].as_i64(), Some(message_id));
    assert_eq!(messages[0]["content"], "hello");

    let uri = format!("/api/messages/{}", message_id);
    let (status, _) = call(&app, request(Method::DELETE, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, request(Method::DELETE, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_send_to_unknown_conversation() {
    let (app, store) = app();
    let token = access_token(1);

    let (status, _) = call(
        &app,
        request(
            Method::POST,
            "/api/messages",
            Some(&token),
            Some(json!({"conversation_id": 999, "sender_id": 1, "content": "hi"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.message_count(), 0);
}

#[tokio::test]
async fn test_rest_send_does_not_reach_realtime_peers() {
    let server = TestServer::start().await;
    let mut peer = server.connect().await;
    let app = create_router(server.state.clone());

    let (status, _) = call(
        &app,
        request(
            Method::POST,
            "/api/messages",
            Some(&access_token(1)),
            Some(json!({"conversation_id": 1, "sender_id": 1, "content": "quiet"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.store.message_count(), 1);
    expect_silence(&mut peer).await;
}

#[tokio::test]
async fn test_signup_without_database_is_unavailable() {
    let (app, _) = app();
    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({"username": "alice", "email": "alice@example.com", "password": "password123"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Database not available");
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let (app, _) = app();
    let (status, body) = call(&app, request(Method::GET, "/nope", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not Found", "status": 404}));
}

#[tokio::test]
async fn test_plain_get_on_ws_is_not_upgraded() {
    let (state, _) = test_state(1);
    let hub = state.hub.clone();
    let app = create_router(state);

    let response = app
        .oneshot(request(Method::GET, "/ws", None, None))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(hub.connection_count(), 0);
}

#[tokio::test]
async fn test_resend_confirmation_without_database_is_unavailable() {
    let (app, _) = app();
    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/api/auth/resend-confirmation",
            None,
            Some(json!({"email": "alice@example.com"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Database not available");
}

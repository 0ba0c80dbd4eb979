//! Common test utilities and helpers
//!
//! - `TestServer` - the full router on an ephemeral port, backed by an
//!   in-memory store with conversation 1 pre-created
//! - websocket client helpers built on `tokio-tungstenite`
//! - token helpers for the protected REST routes
//! - request helpers for driving the router with `tower::ServiceExt`
//! - `test_database_url` for the PostgreSQL-backed tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use instaspace::backend::auth::sessions::{create_token, TokenKind};
use instaspace::backend::messaging::InMemoryMessageStore;
use instaspace::backend::routes::create_router;
use instaspace::backend::server::{in_memory_state, AppState};
use instaspace::shared::config::AppConfig;
use tokio::net::{TcpListener, TcpStream};
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const TEST_SECRET: &str = "integration-test-secret";

/// How long a peer must stay silent to count as "received nothing"
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .jwt_secret(TEST_SECRET)
        .build()
        .unwrap()
}

/// PostgreSQL URL for the database-backed tests, when one is provided
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok().filter(|url| !url.is_empty())
}

/// State over a fresh in-memory store with `conversations` pre-created
pub fn test_state(conversations: usize) -> (AppState, Arc<InMemoryMessageStore>) {
    state_with(test_config(), conversations)
}

fn state_with(config: AppConfig, conversations: usize) -> (AppState, Arc<InMemoryMessageStore>) {
    let store = Arc::new(InMemoryMessageStore::with_conversations(conversations));
    (in_memory_state(config, store.clone()), store)
}

pub fn access_token(user_id: i64) -> String {
    create_token(
        TEST_SECRET,
        user_id,
        "user@example.com",
        TokenKind::Access,
        Duration::from_secs(3600),
    )
    .unwrap()
}

/// A running server on 127.0.0.1 with an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub store: Arc<InMemoryMessageStore>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(test_config()).await
    }

    /// Same as [`TestServer::start`] with custom hub settings
    pub async fn start_with(config: AppConfig) -> Self {
        let (state, store) = state_with(config, 1);
        let app = create_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            store,
            handle,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn connections(&self) -> usize {
        self.state.hub.connection_count()
    }

    /// Open a websocket and wait until the server has registered it
    pub async fn connect(&self) -> WsClient {
        let before = self.connections();
        let (client, _response) = connect_async(self.ws_url()).await.unwrap();
        self.wait_for_connections(before + 1).await;
        client
    }

    /// Poll the registry until it holds exactly `expected` connections
    pub async fn wait_for_connections(&self, expected: usize) {
        let waited = tokio::time::timeout(RECV_TIMEOUT, async {
            while self.connections() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(
            waited.is_ok(),
            "expected {} connections, registry holds {}",
            expected,
            self.connections()
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn send_json(client: &mut WsClient, value: serde_json::Value) {
    client
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

pub async fn send_text(client: &mut WsClient, text: &str) {
    client.send(Message::Text(text.to_string().into())).await.unwrap();
}

/// Next text frame as JSON, skipping control frames
pub async fn recv_json(client: &mut WsClient) -> serde_json::Value {
    let next = tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return serde_json::from_str(text.as_str()).unwrap(),
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                other => panic!("expected a text frame, got {:?}", other),
            }
        }
    })
    .await;
    next.expect("timed out waiting for a frame")
}

/// Assert that no text frame arrives within the quiet period
pub async fn expect_silence(client: &mut WsClient) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(QUIET_PERIOD, client.next()).await {
        panic!("expected no frame, got {}", text.as_str());
    }
}

/// True once the server has closed the stream
pub async fn closed_by_server(client: &mut WsClient) -> bool {
    let outcome = tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match client.next().await {
                None | Some(Ok(Message::Close(_))) | Some(Err(_)) => return true,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    outcome.unwrap_or(false)
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Run one request through the router; empty bodies come back as `Null`
pub async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

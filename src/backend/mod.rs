//! Backend Module
//!
//! All server-side code: the axum HTTP server, the realtime websocket hub,
//! authentication, and message and photo persistence. Only compiled with the
//! `ssr` feature.
//!
//! # Architecture
//!
//! - **`server`** - state, database setup, initialization
//! - **`routes`** - route configuration and router assembly
//! - **`realtime`** - the websocket fan-out hub
//! - **`messaging`** - message store and REST endpoints
//! - **`social`** - photos, comments and likes
//! - **`auth`** - users, JWT tokens, auth handlers
//! - **`middleware`** - bearer-token authentication
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── main.rs        - server binary
//! ├── server/
//! ├── routes/
//! ├── realtime/
//! ├── messaging/
//! ├── social/
//! ├── auth/
//! ├── middleware/
//! └── error/
//! ```
//!
//! # State Management
//!
//! `AppState` holds the configuration, the optional PostgreSQL pool, the
//! message and social stores, and the realtime hub. There is no process-global state;
//! everything is reached through `AppState`.
//!
//! # Example
//!
//! ```rust,no_run
//! use instaspace::backend::server::create_app;
//! use instaspace::shared::AppConfig;
//!
//! # async fn example() {
//! let (app, state) = create_app(AppConfig::default()).await;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! state.hub.shutdown();
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Realtime websocket hub
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Message persistence and REST endpoints
pub mod messaging;

/// Photos, comments and likes
pub mod social;

pub use error::BackendError;
pub use realtime::Hub;
pub use server::{create_app, AppState};

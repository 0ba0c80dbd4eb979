//! InstaSpace - realtime messaging backend
//!
//! Users exchange direct messages inside two-party conversations. Messages
//! are persisted through a message store and fanned out live to every
//! connected websocket peer. Photos, comments and likes are plain REST
//! resources next to the messaging routes.
//!
//! # Module Structure
//!
//! - **`shared`** - wire frames, message and conversation types,
//!   photo and comment types, configuration, shared errors. Always compiled.
//! - **`backend`** - axum server, realtime hub, auth, persistence. Compiled
//!   with the `ssr` feature (on by default).
//!
//! # Realtime Protocol
//!
//! A peer connects to `GET /ws` and sends text frames:
//!
//! ```json
//! {"conversation_id": 1, "sender_id": 42, "content": "hi"}
//! ```
//!
//! Each accepted frame is stored and every connected peer, the sender
//! included, receives:
//!
//! ```json
//! {"message_id": 7, "conversation_id": 1, "sender_id": 42, "content": "hi"}
//! ```
//!
//! Rejected frames get `{"error": "..."}` on the sender's connection only.
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for decoding and validation
//! - `backend::error::BackendError` for HTTP handlers
//! - `backend::messaging::StoreError` and `backend::realtime::DispatchError`
//!   for persistence and fan-out

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

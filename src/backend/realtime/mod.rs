//! Realtime Module
//!
//! Websocket fan-out hub: every accepted frame is persisted and then pushed
//! to every connected peer.
//!
//! # Architecture
//!
//! - **`connection`** - per-peer handle: bounded outbound queue + cancellation
//! - **`registry`** - the mutex-guarded set of live connections
//! - **`broadcast`** - persist-then-fan-out of inbound frames
//! - **`session`** - per-connection read loop, writer task and cleanup
//! - **`supervisor`** - the `Hub`, the `/ws` handshake and shutdown
//! - **`error`** - dispatch and push errors
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs
//! ├── connection.rs
//! ├── registry.rs
//! ├── broadcast.rs
//! ├── session.rs
//! ├── supervisor.rs
//! └── error.rs
//! ```
//!
//! # Concurrency
//!
//! Each session runs on its own task, with a second task draining its
//! outbound queue into the socket. A broadcast runs on the task of the
//! session that received the frame. The registry is the only shared mutable
//! state and its lock is never held across an await or a socket write.

pub mod broadcast;
pub mod connection;
pub mod error;
pub mod registry;
pub mod session;
pub mod supervisor;

pub use broadcast::{Broadcaster, FanOutReport};
pub use connection::{Connection, ConnectionId, Outbound};
pub use error::{DispatchError, PushError};
pub use registry::ConnectionRegistry;
pub use session::{FrameOutcome, Session, SessionGuard, SessionState};
pub use supervisor::{ws_handler, Hub};

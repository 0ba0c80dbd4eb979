//! Messaging Module
//!
//! Conversation and message persistence plus the REST endpoints over it.
//!
//! - **`store`** - the `MessageStore` trait and `StoreError`
//! - **`db`** - PostgreSQL queries and `PgMessageStore`
//! - **`memory`** - `InMemoryMessageStore`
//! - **`handlers`** - `/api/conversations` and `/api/messages`

pub mod db;
pub mod handlers;
pub mod memory;
pub mod store;

pub use db::PgMessageStore;
pub use memory::InMemoryMessageStore;
pub use store::{MessageStore, StoreError};

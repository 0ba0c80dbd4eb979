//! Integration test suite for InstaSpace
//!
//! - `api` - REST routes driven through the router
//! - `realtime` - the websocket hub, end to end and under concurrency
//! - `database` - PostgreSQL-backed stores, run when `TEST_DATABASE_URL` is set

#[path = "../common/mod.rs"]
mod common;

mod database;
mod realtime;

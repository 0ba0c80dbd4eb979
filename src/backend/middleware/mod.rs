//! Middleware Module
//!
//! HTTP middleware applied to route groups.
//!
//! - **`auth`** - bearer-token authentication for the REST messaging routes

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};

//! Authentication Module
//!
//! User accounts, password hashing and JWT issuance.
//!
//! # Architecture
//!
//! - **`users`** - user model and its SQL
//! - **`sessions`** - access and confirmation tokens
//! - **`handlers`** - signup, confirm, resend-confirmation, login, me
//!
//! Realtime frames carry the sender id in-band and are not authenticated;
//! tokens guard the REST messaging endpoints only.

pub mod users;

pub mod sessions;

pub mod handlers;

pub use handlers::{confirm, get_me, login, resend_confirmation, signup};
pub use handlers::{AuthResponse, LoginRequest, SignupRequest, SignupResponse, UserResponse};
pub use sessions::{Claims, TokenError, TokenKind};

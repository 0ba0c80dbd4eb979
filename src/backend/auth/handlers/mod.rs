//! Authentication Handlers
//!
//! - **`signup`** - `POST /api/auth/signup`
//! - **`confirm`** - `GET /api/auth/confirm`
//! - **`resend`** - `POST /api/auth/resend-confirmation`
//! - **`login`** - `POST /api/auth/login`
//! - **`me`** - `GET /api/auth/me`
//!
//! All of them need the PostgreSQL pool and answer 503 without it.

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Email confirmation handler
pub mod confirm;

/// Resend confirmation handler
pub mod resend;

/// Login handler
pub mod login;

/// Get current user handler
pub mod me;

pub use types::{
    AuthResponse, ConfirmQuery, LoginRequest, MessageResponse, ResendConfirmationRequest,
    SignupRequest, SignupResponse, UserResponse,
};

pub use confirm::confirm;
pub use login::login;
pub use me::get_me;
pub use resend::resend_confirmation;
pub use signup::signup;

/**
 * Authentication Handler Types
 *
 * Request and response bodies shared by the signup, confirm, login and me
 * handlers.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;
use crate::shared::messaging::UserId;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Query string of the confirmation link
#[derive(Deserialize, Debug)]
pub struct ConfirmQuery {
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Signup answer. No token: access starts after the email is confirmed and
/// the user logs in.
#[derive(Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ResendConfirmationRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public view of a user; never includes the password hash
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            verified: user.verified,
        }
    }
}

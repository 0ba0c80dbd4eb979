/**
 * Signup Handler
 *
 * `POST /api/auth/signup`
 *
 * 1. Validate username, email and password
 * 2. Reject duplicate usernames and emails with 409
 * 3. Hash the password with bcrypt and create an unverified user
 * 4. Issue a confirmation token (logged; delivering it is out of scope)
 * 5. Return the user; an access token only comes from login once the email
 *    is confirmed
 */

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::auth::handlers::confirm::issue_confirmation;
use crate::backend::auth::handlers::types::{SignupRequest, SignupResponse};
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::error::BackendError;
use crate::shared::config::AppConfig;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Field checks that need no database
pub fn validate_signup(request: &SignupRequest) -> Result<(), BackendError> {
    if !is_valid_username(&request.username) {
        return Err(BackendError::bad_request(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }
    if !request.email.contains('@') {
        return Err(BackendError::bad_request("Invalid email format"));
    }
    if request.password.len() < 8 {
        return Err(BackendError::bad_request("Password must be at least 8 characters"));
    }
    Ok(())
}

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid username, email or password
/// * `409 Conflict` - username or email already registered
/// * `503 Service Unavailable` - no database configured
pub async fn signup(
    State(pool): State<Option<PgPool>>,
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), BackendError> {
    let pool = pool.ok_or(BackendError::Unavailable("Database"))?;
    tracing::info!(username = %request.username, "Signup request");

    validate_signup(&request)?;

    let existing = get_user_by_username(&pool, &request.username)
        .await
        .map_err(|e| BackendError::internal("Failed to look up user", e))?;
    if existing.is_some() {
        return Err(BackendError::handler(StatusCode::CONFLICT, "Username already taken"));
    }

    let existing = get_user_by_email(&pool, &request.email)
        .await
        .map_err(|e| BackendError::internal("Failed to look up user", e))?;
    if existing.is_some() {
        return Err(BackendError::handler(StatusCode::CONFLICT, "Email already registered"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| BackendError::internal("Failed to hash password", e))?;

    let user = create_user(&pool, &request.username, &request.email, &password_hash)
        .await
        .map_err(|e| BackendError::internal("Failed to create user", e))?;

    issue_confirmation(&config, &user)?;
    tracing::info!(user_id = user.id, "User created: {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Registration successful, confirm your email to log in".to_string(),
            user: user.into(),
        }),
    ))
}

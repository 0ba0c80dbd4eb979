/**
 * Login Handler
 *
 * `POST /api/auth/login`
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Refuse accounts whose email is not confirmed yet
 * 4. Return an access token and the user
 *
 * Unknown email and wrong password give the same 401 so accounts cannot be
 * enumerated.
 */

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::sessions::{create_token, TokenKind};
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::BackendError;
use crate::shared::config::AppConfig;

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - unknown email or wrong password
/// * `403 Forbidden` - email not confirmed
/// * `503 Service Unavailable` - no database configured
pub async fn login(
    State(pool): State<Option<PgPool>>,
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let pool = pool.ok_or(BackendError::Unavailable("Database"))?;

    let user = get_user_by_email(&pool, &request.email)
        .await
        .map_err(|e| BackendError::internal("Failed to look up user", e))?
        .ok_or_else(|| {
            tracing::warn!("Login for unknown email");
            BackendError::unauthorized("Invalid email or password")
        })?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| BackendError::internal("Password verification error", e))?;
    if !valid {
        tracing::warn!(user_id = user.id, "Invalid password");
        return Err(BackendError::unauthorized("Invalid email or password"));
    }

    if !user.verified {
        return Err(BackendError::handler(
            StatusCode::FORBIDDEN,
            "Email not confirmed",
        ));
    }

    let token = create_token(
        &config.jwt_secret,
        user.id,
        &user.email,
        TokenKind::Access,
        config.token_ttl(),
    )
    .map_err(|e| BackendError::internal("Failed to create token", e))?;

    tracing::info!(user_id = user.id, "User logged in: {}", user.username);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

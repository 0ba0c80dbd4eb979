//! Resend confirmation handler - `POST /api/auth/resend-confirmation`

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::PgPool;

use crate::backend::auth::handlers::confirm::issue_confirmation;
use crate::backend::auth::handlers::types::{MessageResponse, ResendConfirmationRequest};
use crate::backend::auth::users::{get_user_by_email, User};
use crate::backend::error::BackendError;
use crate::shared::config::AppConfig;

/// Only existing, still unverified accounts get a new link
fn pending_confirmation(user: Option<User>) -> Result<User, BackendError> {
    match user {
        None => Err(BackendError::handler(StatusCode::NOT_FOUND, "User not found")),
        Some(user) if user.verified => Err(BackendError::bad_request("Email already confirmed")),
        Some(user) => Ok(user),
    }
}

/// Issue a fresh confirmation token
///
/// # Errors
///
/// * `400 Bad Request` - account already confirmed
/// * `404 Not Found` - no account with that email
/// * `503 Service Unavailable` - no database configured
pub async fn resend_confirmation(
    State(pool): State<Option<PgPool>>,
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ResendConfirmationRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let pool = pool.ok_or(BackendError::Unavailable("Database"))?;

    let user = get_user_by_email(&pool, &request.email)
        .await
        .map_err(|e| BackendError::internal("Failed to look up user", e))?;
    let user = pending_confirmation(user)?;

    issue_confirmation(&config, &user)?;
    tracing::info!(user_id = user.id, "Confirmation resent");

    Ok(Json(MessageResponse::new("Confirmation email sent again")))
}

//! Email confirmation handler - `GET /api/auth/confirm?token=...`

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::ConfirmQuery;
use crate::backend::auth::sessions::{create_token, verify_token, TokenKind};
use crate::backend::auth::users::{mark_verified, User};
use crate::backend::error::BackendError;
use crate::shared::config::AppConfig;

/// Create a confirmation token for `user` and log the link that carries it.
pub fn issue_confirmation(config: &AppConfig, user: &User) -> Result<String, BackendError> {
    let token = create_token(
        &config.jwt_secret,
        user.id,
        &user.email,
        TokenKind::Confirmation,
        config.token_ttl(),
    )
    .map_err(|e| BackendError::internal("Failed to create token", e))?;

    tracing::info!(
        user_id = user.id,
        "Confirmation link: /api/auth/confirm?token={}",
        token
    );
    Ok(token)
}

/// Mark the account named by a confirmation token as verified
pub async fn confirm(
    State(pool): State<Option<PgPool>>,
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let pool = pool.ok_or(BackendError::Unavailable("Database"))?;

    let claims = verify_token(&config.jwt_secret, &query.token, TokenKind::Confirmation)
        .map_err(|e| {
            tracing::warn!("Rejected confirmation token: {}", e);
            BackendError::bad_request("Invalid or expired confirmation token")
        })?;

    let updated = mark_verified(&pool, &claims.email)
        .await
        .map_err(|e| BackendError::internal("Failed to confirm email", e))?;
    if !updated {
        return Err(BackendError::handler(StatusCode::NOT_FOUND, "User not found"));
    }

    tracing::info!(email = %claims.email, "Email confirmed");
    Ok(Json(serde_json::json!({ "message": "Email confirmed" })))
}

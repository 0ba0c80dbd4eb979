/**
 * Get Current User Handler
 *
 * `GET /api/auth/me` - sits behind the auth middleware, so the caller's id
 * is already verified when this runs.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;

pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UserResponse>, BackendError> {
    let pool = pool.ok_or(BackendError::Unavailable("Database"))?;

    let user = get_user_by_id(&pool, auth.user_id)
        .await
        .map_err(|e| BackendError::internal("Failed to look up user", e))?
        .ok_or_else(|| BackendError::handler(StatusCode::NOT_FOUND, "User not found"))?;

    Ok(Json(user.into()))
}

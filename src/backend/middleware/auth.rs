/**
 * Authentication Middleware
 *
 * Protects the REST messaging routes. It extracts the bearer token from the
 * Authorization header, verifies it as an access token, and attaches an
 * `AuthenticatedUser` to the request extensions for handlers to pick up
 * through the `AuthUser` extractor.
 *
 * When a database is configured the user must also still exist and have
 * confirmed their email.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::{verify_token, TokenKind};
use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::messaging::UserId;

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Authentication middleware
///
/// Returns 401 Unauthorized if the token is missing, malformed, expired, of
/// the wrong kind, or names a user that no longer exists, and 403 Forbidden
/// while the user's email is unconfirmed.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok()))?;

    let claims = verify_token(&app_state.config.jwt_secret, token, TokenKind::Access).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        BackendError::unauthorized("Invalid token")
    })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        BackendError::unauthorized("Invalid token")
    })?;

    if let Some(pool) = &app_state.db_pool {
        let user = get_user_by_id(pool, user_id)
            .await
            .map_err(|e| BackendError::internal("Failed to look up user", e))?;
        ensure_active(user_id, user)?;
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Pull the token out of an `Authorization: Bearer <token>` value
fn bearer_token(header: Option<&str>) -> Result<&str, BackendError> {
    let header = header.ok_or_else(|| {
        tracing::warn!("Missing Authorization header");
        BackendError::unauthorized("Missing Authorization header")
    })?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        BackendError::unauthorized("Invalid Authorization header")
    })
}

/// The token's user must exist and be confirmed
fn ensure_active(user_id: UserId, user: Option<User>) -> Result<User, BackendError> {
    match user {
        Some(user) if user.verified => Ok(user),
        Some(_) => {
            tracing::warn!(user_id, "Token for unconfirmed user");
            Err(BackendError::handler(StatusCode::FORBIDDEN, "Email not confirmed"))
        }
        None => {
            tracing::warn!(user_id, "Token for unknown user");
            Err(BackendError::unauthorized("Invalid token"))
        }
    }
}

/// Axum extractor for the user set by [`auth_middleware`]
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Not authenticated")
            })
    }
}

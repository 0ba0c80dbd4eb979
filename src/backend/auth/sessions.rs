/**
 * Session Management and JWT Tokens
 *
 * Two kinds of HS256 token share one signing secret:
 *
 * - `Access` - returned by signup and login, sent as `Authorization: Bearer`
 * - `Confirmation` - embedded in the email confirmation link
 *
 * A token of one kind is never accepted where the other is expected.
 */

use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::messaging::UserId;

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Confirmation,
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub kind: TokenKind,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::MalformedSubject)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("expected a {expected:?} token")]
    WrongKind { expected: TokenKind },
    #[error("token subject is not a user id")]
    MalformedSubject,
}

fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

/// Create a signed token for a user
pub fn create_token(
    secret: &str,
    user_id: UserId,
    email: &str,
    kind: TokenKind,
    ttl: Duration,
) -> Result<String, TokenError> {
    let now = now_secs();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        kind,
        exp: now.saturating_add(ttl.as_secs()),
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Verify signature, expiry and kind
pub fn verify_token(secret: &str, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let claims = decode::<Claims>(token, &key, &Validation::default())?.claims;

    if claims.kind != expected {
        return Err(TokenError::WrongKind { expected });
    }
    Ok(claims)
}

//! Authentication extractor and token helpers.
//!
//! Bearer tokens are HS256 JWTs signed with the shared secret from
//! [`ServiceConfig`](crate::ServiceConfig). Claims carry the user ID in
//! `sub` and the caller's role.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use eventra_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Lifetime of tokens issued by [`issue_token`].
const TOKEN_TTL_SECONDS: i64 = 3600;

/// Caller role carried in the token's `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular attendee.
    Individual,

    /// Event-publishing organization.
    Company,

    /// Platform moderator.
    Admin,
}

impl UserRole {
    /// Whether this role has moderation privileges.
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Caller role.
    pub role: UserRole,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    pub iat: i64,
}

/// An authenticated user extracted from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
    /// The caller's role.
    pub role: UserRole,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // Extract the Authorization header
            let auth_header = parts
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            // Extract the Bearer token
            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(ApiError::Unauthorized)?;

            let claims = validate_token(token, &state.config.auth_secret)?;

            let user_id = claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            Ok(AuthUser {
                user_id,
                role: claims.role,
            })
        })
    }
}

/// Validate an HS256 token and return its claims.
fn validate_token(token: &str, secret: &str) -> Result<JwtClaims, ApiError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<JwtClaims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        ApiError::Unauthorized
    })?;

    Ok(token_data.claims)
}

/// Issue a signed HS256 token for a user.
///
/// Used by tests and local tooling; production tokens come from the
/// identity provider sharing the same secret.
///
/// # Errors
///
/// Returns an error if signing fails.
pub fn issue_token(
    secret: &str,
    user_id: UserId,
    role: UserRole,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role,
        exp: now + TOKEN_TTL_SECONDS,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        let user_id = UserId::generate();
        let token = issue_token("secret", user_id, UserRole::Company).unwrap();

        let claims = validate_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, UserRole::Company);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token("secret", UserId::generate(), UserRole::Individual).unwrap();
        assert!(validate_token(&token, "other-secret").is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(validate_token("not-a-jwt", "secret").is_err());
    }

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&UserRole::Individual).unwrap();
        assert_eq!(json, "\"individual\"");
    }
}

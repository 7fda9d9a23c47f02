//! Access gate: resolves the caller's identity from a bearer credential.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::token;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Authenticated caller extracted from the `Authorization: Bearer` header.
///
/// A missing credential is a 401; a malformed or expired one is a 400,
/// mirroring the gate's two rejection modes.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Auth("Access denied. No token provided.".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Auth("Access denied. No token provided.".to_string()))?;

        let claims = token::verify(token, &state.config.jwt_secret)
            .map_err(|_| AppError::InvalidToken("Invalid token.".to_string()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

use axum::{extract::FromRequestParts, http::request::Parts};
use sha2::{Digest, Sha256};
use common::Production;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated API client extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
pub struct AuthClient {
    pub client_id: String,
}

impl AuthClient {
    /// Returns `Ok(())` if the client owns the production, `Err(PermissionDenied)` otherwise.
    pub fn require_owner(&self, production: &Production) -> Result<(), AppError> {
        if production.owner == self.client_id {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthClient {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthClient {
            client_id: claims.sub,
        })
    }
}

/// Header carrying the task runner's shared secret.
pub const TASK_TOKEN_HEADER: &str = "X-Task-Token";

/// Caller of an internal task route, authenticated by the `X-Task-Token` header.
pub struct TaskCaller;

impl FromRequestParts<AppState> for TaskCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = state
            .config
            .auth
            .task_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(AppError::PermissionDenied)?;

        let token = parts
            .headers
            .get(TASK_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        // Fixed-length digests keep the comparison independent of the secret's length.
        if Sha256::digest(token.as_bytes()) != Sha256::digest(secret.as_bytes()) {
            return Err(AppError::TokenInvalid);
        }
        Ok(TaskCaller)
    }
}

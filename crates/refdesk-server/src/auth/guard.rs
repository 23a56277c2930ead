//! Route guards: login and admin extractors.
//!
//! A request is authenticated iff its bearer token validates against the
//! JWT secret and its hash still maps to a live (non-revoked, non-expired)
//! session row. The guards run before any handler logic touches the store.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::claims::Claims;
use crate::auth::jwt::JwtManager;
use crate::error::ApiError;
use crate::routes::AppState;

/// Any authenticated session (`requireLogin`).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
    /// Hash of the presenting token, for logout/revocation.
    pub token_hash: String,
}

/// An authenticated session with the admin role (`requireAdmin`).
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub claims: Claims,
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthUser, ApiError> {
    let token = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Auth("Missing authorization header".to_string()))?;

    let claims = state
        .jwt
        .validate(token)
        .map_err(|_| ApiError::Auth("Invalid session token".to_string()))?;

    let token_hash = JwtManager::hash_token(token);
    let session = state
        .db
        .get_session_by_hash(&token_hash)
        .await
        .map_err(ApiError::from)?;
    if session.is_none() {
        return Err(ApiError::Auth("Session expired or revoked".to_string()));
    }

    Ok(AuthUser { claims, token_hash })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = authenticate(parts, state).await?;
        if !auth.claims.is_admin() {
            return Err(ApiError::Forbidden("Administrator access required".to_string()));
        }
        Ok(Self {
            claims: auth.claims,
        })
    }
}

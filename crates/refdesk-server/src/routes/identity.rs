//! Identity & access routes: register, login, logout, profile.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::auth::guard::AuthUser;
use crate::auth::password;
use crate::error::ApiError;
use crate::storage::{ProfileUpdate, User};

use super::{AppState, MessageResponse, optional_field, require_field};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tax_code: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub club: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let first_name = require_field(req.first_name, "first name")?;
    let last_name = require_field(req.last_name, "last name")?;
    let tax_code = require_field(req.tax_code, "national id")?;
    let email = require_field(req.email, "email")?;
    let password = require_field(req.password, "password")?;
    let club = optional_field(req.club);

    if password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let hash = password::hash_password(&password).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        ApiError::Storage("Registration failed".to_string())
    })?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let created = state
        .db
        .create_user(
            &user_id,
            &first_name,
            &last_name,
            &tax_code,
            &email,
            &hash,
            club.as_deref(),
        )
        .await?;

    // A duplicate email is deliberately indistinguishable from a fresh
    // registration in the response.
    if created {
        info!(user_id = %user_id, email = %email, "User registered");
    } else {
        info!(email = %email, "Registration for existing email ignored");
    }

    Ok(Json(MessageResponse::new("Registration complete")))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_secs: i64,
    pub user_id: String,
    pub role: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = require_field(req.email, "email")?;
    let password = require_field(req.password, "password")?;

    // Unknown email and wrong password collapse into the same 401.
    let user = state
        .db
        .get_user_by_email(&email)
        .await
        .map_err(|_| ApiError::Auth("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&password, &user.password_hash).map_err(|e| {
        error!(error = %e, "Password verification failed");
        ApiError::Storage("Login failed".to_string())
    })?;

    if !valid {
        warn!(email = %email, "Failed login attempt");
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    }

    let (token, expires_at) = state.jwt.issue_session_token(&user).map_err(|e| {
        error!(error = %e, "Token creation failed");
        ApiError::Storage("Login failed".to_string())
    })?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let token_hash = crate::auth::JwtManager::hash_token(&token);
    state
        .db
        .create_session(&session_id, &user.id, &token_hash, expires_at)
        .await?;

    info!(user_id = %user.id, email = %user.email, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in_secs: state.jwt.session_ttl_secs(),
        user_id: user.id,
        role: user.role,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.db.revoke_session_by_hash(&auth.token_hash).await?;
    info!(user_id = %auth.claims.sub, "User logged out");
    Ok(Json(MessageResponse::new("Logged out")))
}

pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<User>, ApiError> {
    let user = state.db.get_user(&auth.claims.sub).await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tax_code: Option<String>,
    pub club: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let update = ProfileUpdate {
        first_name: optional_field(req.first_name),
        last_name: optional_field(req.last_name),
        tax_code: optional_field(req.tax_code),
        club: optional_field(req.club),
        phone: optional_field(req.phone),
        address: optional_field(req.address),
        city: optional_field(req.city),
    };

    state.db.update_profile(&auth.claims.sub, &update).await?;
    Ok(Json(MessageResponse::new("Profile updated")))
}

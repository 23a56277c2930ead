//! Administrative user management routes.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::{error, info};

use crate::auth::guard::AdminUser;
use crate::auth::password;
use crate::error::ApiError;
use crate::storage::{User, UserUpdate};

use super::{AppState, MessageResponse, optional_field};

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub certified: Option<bool>,
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.db.list_users(query.certified).await?;
    Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tax_code: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub club: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub certified: Option<bool>,
}

pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let password_hash = match optional_field(req.password) {
        Some(password) => Some(password::hash_password(&password).map_err(|e| {
            error!(error = %e, "Password hashing failed");
            ApiError::Storage("User update failed".to_string())
        })?),
        None => None,
    };

    let update = UserUpdate {
        first_name: optional_field(req.first_name),
        last_name: optional_field(req.last_name),
        tax_code: optional_field(req.tax_code),
        email: optional_field(req.email),
        password_hash,
        role: optional_field(req.role),
        club: optional_field(req.club),
        phone: optional_field(req.phone),
        address: optional_field(req.address),
        city: optional_field(req.city),
        certified: req.certified,
    };

    state.db.admin_update_user(&id, &update).await?;

    info!(user_id = %id, admin = %admin.claims.sub, "User updated");
    Ok(Json(MessageResponse::new("User updated")))
}

pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.db.delete_user(&id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("User {id} not found")));
    }

    info!(user_id = %id, admin = %admin.claims.sub, "User deleted");
    Ok(Json(MessageResponse::new("User deleted")))
}

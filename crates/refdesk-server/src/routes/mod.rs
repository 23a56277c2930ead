//! HTTP routes for the Refdesk server.

mod admin;
mod identity;
mod matches;
mod users;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::auth::JwtManager;
use crate::error::ApiError;
use crate::storage::Database;
use crate::uploads::UploadStore;

/// Shared application state.
///
/// Every handler receives its collaborators through this struct; nothing
/// is ambient.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub uploads: UploadStore,
}

/// Generic success envelope for mutating routes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Unwrap a required request field, trimming whitespace; absent or empty
/// fields fail validation before any store access.
pub(crate) fn require_field(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ApiError::Validation(format!("Missing required field: {name}"))),
    }
}

/// Normalise an optional field: empty strings become `None`.
pub(crate) fn optional_field(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Identity & access
        .route("/register", post(identity::register))
        .route("/login", post(identity::login))
        .route("/logout", get(identity::logout))
        .route("/me", get(identity::me))
        .route("/update-profile", post(identity::update_profile))
        // Match lifecycle
        .route("/partite", get(matches::list_matches))
        .route("/partite/crea", post(matches::create_match))
        .route("/partite/registrati", post(matches::register_for_match))
        .route("/partite/finegara", post(matches::submit_match_report))
        .route(
            "/partite/conferma-visualizzazione",
            post(matches::confirm_viewing),
        )
        .route("/mie-iscrizioni", get(matches::my_registrations))
        // Administration
        .route("/partite/stato", post(admin::update_match_status))
        .route("/iscrizioni/ruolo", post(admin::update_registration_role))
        .route("/admin/reset", post(admin::reset))
        .route("/admin/upload-csv", post(admin::upload_csv))
        .route("/report-partite", get(admin::report))
        .route("/admin/report-advanced", get(admin::report_advanced))
        .route("/admin/users", get(users::list_users))
        .route(
            "/admin/users/{id}",
            post(users::update_user).delete(users::delete_user),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

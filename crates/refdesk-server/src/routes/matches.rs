//! Match lifecycle routes: create, list, register, end-of-match
//! submission, viewing confirmation, own registrations.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::extract::multipart::MultipartError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::guard::AuthUser;
use crate::error::ApiError;
use crate::storage::{
    CALLER_ROLE, Match, NewMatch, RegistrationWithMatch, SubmissionUpdate,
};

use super::{AppState, MessageResponse, optional_field, require_field};

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub championship: Option<String>,
    pub group_name: Option<String>,
    pub match_date: Option<String>,
    pub match_number: Option<String>,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub venue: Option<String>,
    pub kickoff_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateMatchResponse {
    pub match_id: String,
    pub message: String,
}

pub async fn create_match(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateMatchRequest>,
) -> Result<Json<CreateMatchResponse>, ApiError> {
    let new = NewMatch {
        championship: require_field(req.championship, "championship")?,
        group_name: optional_field(req.group_name),
        match_date: require_field(req.match_date, "date")?,
        match_number: require_field(req.match_number, "match number")?,
        team_a: require_field(req.team_a, "team A")?,
        team_b: require_field(req.team_b, "team B")?,
        venue: optional_field(req.venue),
        kickoff_time: optional_field(req.kickoff_time),
    };

    let match_id = uuid::Uuid::new_v4().to_string();
    let created = state.db.create_match(&match_id, &new).await?;

    info!(match_id = %created.id, user_id = %auth.claims.sub, "Match created");

    Ok(Json(CreateMatchResponse {
        match_id: created.id,
        message: "Match created".to_string(),
    }))
}

/// A match annotated with the users who confirmed viewing it.
#[derive(Debug, Serialize)]
pub struct MatchWithViewers {
    #[serde(flatten)]
    pub match_row: Match,
    pub viewed_by: Vec<String>,
}

pub async fn list_matches(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<MatchWithViewers>>, ApiError> {
    let matches = state.db.list_matches().await?;
    let viewings = state.db.list_viewings().await?;

    let mut viewers_by_match: HashMap<String, Vec<String>> = HashMap::new();
    for viewing in viewings {
        viewers_by_match
            .entry(viewing.match_id)
            .or_default()
            .push(viewing.user_id);
    }

    let annotated = matches
        .into_iter()
        .map(|m| {
            let viewed_by = viewers_by_match.remove(&m.id).unwrap_or_default();
            MatchWithViewers {
                match_row: m,
                viewed_by,
            }
        })
        .collect();

    Ok(Json(annotated))
}

#[derive(Debug, Deserialize)]
pub struct RegisterForMatchRequest {
    pub match_id: Option<String>,
    pub role: Option<String>,
    pub arrival_time: Option<String>,
}

pub async fn register_for_match(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RegisterForMatchRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let match_id = require_field(req.match_id, "match id")?;
    let role = require_field(req.role, "role")?;
    let arrival_time = require_field(req.arrival_time, "arrival time")?;

    // No orphaned ledger rows: the match must exist before the upsert.
    state.db.get_match(&match_id).await?;

    let registration_id = uuid::Uuid::new_v4().to_string();
    let registration = state
        .db
        .upsert_registration(
            &registration_id,
            &auth.claims.sub,
            &match_id,
            &role,
            &arrival_time,
        )
        .await?;

    if registration.role == CALLER_ROLE {
        let started = state.db.set_match_started(&match_id).await?;
        if started {
            info!(match_id = %match_id, user_id = %auth.claims.sub, "Match moved to in_progress");
        }
    }

    info!(
        match_id = %match_id,
        user_id = %auth.claims.sub,
        role = %registration.role,
        "Registration recorded"
    );

    Ok(Json(MessageResponse::new("Registration recorded")))
}

fn malformed_upload(e: MultipartError) -> ApiError {
    warn!(error = %e, "Malformed multipart upload");
    ApiError::Validation("Malformed upload".to_string())
}

pub async fn submit_match_report(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut match_id = None;
    let mut final_result = None;
    let mut notes = None;
    let mut update = SubmissionUpdate::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed_upload)? {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "match_id" => match_id = Some(field.text().await.map_err(malformed_upload)?),
            "final_result" => final_result = Some(field.text().await.map_err(malformed_upload)?),
            "notes" => notes = Some(field.text().await.map_err(malformed_upload)?),
            "data_file" | "pdf_file" | "photo_file" => {
                let original = field.file_name().unwrap_or("artifact").to_string();
                let bytes = field.bytes().await.map_err(malformed_upload)?;
                if bytes.is_empty() {
                    continue;
                }
                let stored = state.uploads.store(&original, &bytes).await?;
                match name.as_str() {
                    "data_file" => update.data_file = Some(stored),
                    "pdf_file" => update.pdf_file = Some(stored),
                    _ => update.photo_file = Some(stored),
                }
            }
            _ => {}
        }
    }

    let match_id = require_field(match_id, "match id")?;
    update.notes = optional_field(notes);
    let final_result = optional_field(final_result);

    // The role is re-read from the ledger on every submission, never taken
    // from the session.
    let registration = state
        .db
        .get_registration_for(&auth.claims.sub, &match_id)
        .await?;

    state.db.apply_submission(&registration.id, &update).await?;

    if registration.role == CALLER_ROLE {
        if let Some(result) = &final_result {
            state.db.complete_match(&match_id, result).await?;
            info!(match_id = %match_id, result = %result, "Match completed");
        }
    }

    info!(
        match_id = %match_id,
        user_id = %auth.claims.sub,
        "End-of-match report submitted"
    );

    Ok(Json(MessageResponse::new("Report submitted")))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmViewingRequest {
    pub match_id: Option<String>,
}

pub async fn confirm_viewing(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ConfirmViewingRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let match_id = require_field(req.match_id, "match id")?;

    state.db.get_match(&match_id).await?;
    state.db.confirm_viewing(&match_id, &auth.claims.sub).await?;

    Ok(Json(MessageResponse::new("Confirmation saved")))
}

pub async fn my_registrations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RegistrationWithMatch>>, ApiError> {
    let rows = state
        .db
        .list_registrations_for_user(&auth.claims.sub)
        .await?;
    Ok(Json(rows))
}

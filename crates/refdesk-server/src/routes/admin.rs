//! Administration routes: overrides, reset, bulk import, reports.

use axum::Json;
use axum::extract::{Multipart, State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use refdesk_core::import;

use crate::auth::guard::AdminUser;
use crate::error::ApiError;
use crate::storage::{ArtifactRow, MatchStatus, NewMatch, ReportRow};

use super::{AppState, MessageResponse, optional_field, require_field};

#[derive(Debug, Deserialize)]
pub struct UpdateMatchStatusRequest {
    pub match_id: Option<String>,
    pub status: Option<String>,
    pub admin_note: Option<String>,
}

pub async fn update_match_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(req): Json<UpdateMatchStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let match_id = require_field(req.match_id, "match id")?;
    let status = require_field(req.status, "status")?;
    let admin_note = optional_field(req.admin_note);

    let parsed = MatchStatus::parse(&status);
    if let MatchStatus::AdminOverride(raw) = &parsed {
        info!(
            match_id = %match_id,
            status = %raw,
            admin = %admin.claims.sub,
            "Status overridden outside the lifecycle set"
        );
    }

    let updated = state
        .db
        .override_match_status(&match_id, parsed.as_str(), admin_note.as_deref())
        .await?;
    if !updated {
        return Err(ApiError::NotFound(format!("Match {match_id} not found")));
    }

    Ok(Json(MessageResponse::new("Match status updated")))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRegistrationRoleRequest {
    pub registration_id: Option<String>,
    pub role: Option<String>,
}

pub async fn update_registration_role(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<UpdateRegistrationRoleRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let registration_id = require_field(req.registration_id, "registration id")?;
    let role = require_field(req.role, "role")?;

    let updated = state
        .db
        .update_registration_role(&registration_id, &role)
        .await?;
    if !updated {
        return Err(ApiError::NotFound(format!(
            "Registration {registration_id} not found"
        )));
    }

    Ok(Json(MessageResponse::new("Registration role updated")))
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub registrations_deleted: u64,
    pub matches_deleted: u64,
}

pub async fn reset(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<ResetResponse>, ApiError> {
    let (registrations_deleted, matches_deleted) = state.db.reset_matches().await?;

    info!(
        admin = %admin.claims.sub,
        registrations_deleted,
        matches_deleted,
        "Match registry reset"
    );

    Ok(Json(ResetResponse {
        registrations_deleted,
        matches_deleted,
    }))
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: u64,
    pub skipped: u64,
}

/// Bulk match import from an uploaded delimited file.
///
/// Best-effort by design: a bad row is logged and skipped, rows already
/// inserted stay.
pub async fn upload_csv(
    State(state): State<AppState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let mut content = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Malformed import upload");
        ApiError::Validation("Malformed upload".to_string())
    })? {
        let bytes = field.bytes().await.map_err(|e| {
            warn!(error = %e, "Malformed import upload");
            ApiError::Validation("Malformed upload".to_string())
        })?;
        if !bytes.is_empty() {
            content = Some(String::from_utf8_lossy(&bytes).into_owned());
            break;
        }
    }

    let Some(content) = content else {
        return Err(ApiError::Validation("Empty import file".to_string()));
    };

    let rows = import::parse_file(&content);
    if rows.is_empty() {
        return Err(ApiError::Validation("Empty import file".to_string()));
    }

    let mut imported = 0u64;
    let mut skipped = 0u64;
    for row in rows {
        match row {
            Ok(row) => {
                let match_id = uuid::Uuid::new_v4().to_string();
                match state.db.create_match(&match_id, &NewMatch::from(row)).await {
                    Ok(_) => imported += 1,
                    Err(e) => {
                        warn!(error = %e, "Import row insert failed");
                        skipped += 1;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Import row rejected");
                skipped += 1;
            }
        }
    }

    info!(imported, skipped, "Bulk match import finished");

    Ok(Json(ImportResponse { imported, skipped }))
}

pub async fn report(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ReportRow>>, ApiError> {
    let rows = state.db.report_rows().await?;
    Ok(Json(rows))
}

/// One match with every artifact submitted against it.
#[derive(Debug, Serialize)]
pub struct MatchArtifacts {
    pub match_id: String,
    pub championship: String,
    pub match_date: String,
    pub match_number: String,
    pub artifacts: Vec<ArtifactEntry>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactEntry {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub kind: String,
    pub filename: String,
}

pub async fn report_advanced(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<MatchArtifacts>>, ApiError> {
    let rows = state.db.artifact_rows().await?;

    let mut grouped: Vec<MatchArtifacts> = Vec::new();
    for row in rows {
        if grouped.last().is_none_or(|g| g.match_id != row.match_id) {
            grouped.push(MatchArtifacts {
                match_id: row.match_id.clone(),
                championship: row.championship.clone(),
                match_date: row.match_date.clone(),
                match_number: row.match_number.clone(),
                artifacts: Vec::new(),
            });
        }
        if let Some(group) = grouped.last_mut() {
            group.artifacts.extend(artifact_entries(&row));
        }
    }

    Ok(Json(grouped))
}

fn artifact_entries(row: &ArtifactRow) -> Vec<ArtifactEntry> {
    let mut entries = Vec::new();
    for (kind, filename) in [
        ("data", row.data_file.as_deref()),
        ("pdf", row.pdf_file.as_deref()),
        ("photo", row.photo_file.as_deref()),
    ] {
        if let Some(filename) = filename {
            entries.push(ArtifactEntry {
                first_name: row.first_name.clone(),
                last_name: row.last_name.clone(),
                role: row.role.clone(),
                kind: kind.to_string(),
                filename: filename.to_string(),
            });
        }
    }
    entries
}

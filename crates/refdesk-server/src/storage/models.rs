//! Data models for Refdesk storage.

use serde::{Deserialize, Serialize};

/// The distinguished primary-reporter role whose registration and
/// submission drive match status transitions.
pub const CALLER_ROLE: &str = "caller";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub tax_code: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub club: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub certified: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: i64,
    pub revoked: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: String,
    pub championship: String,
    pub group_name: Option<String>,
    pub match_date: String,
    pub match_number: String,
    pub team_a: String,
    pub team_b: String,
    pub venue: Option<String>,
    pub kickoff_time: Option<String>,
    pub status: String,
    pub final_result: Option<String>,
    pub admin_note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Match {
    /// The status column parsed into its tagged form.
    pub fn lifecycle_status(&self) -> MatchStatus {
        MatchStatus::parse(&self.status)
    }
}

/// Match lifecycle status.
///
/// The three lifecycle values advance forward via registration and result
/// submission; `AdminOverride` holds any free-form string an administrator
/// wrote over them, kept distinguishable from the lifecycle-driven states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    ToBePlayed,
    InProgress,
    Completed,
    AdminOverride(String),
}

impl MatchStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "to_be_played" => Self::ToBePlayed,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            other => Self::AdminOverride(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ToBePlayed => "to_be_played",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::AdminOverride(s) => s,
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for inserting a new match.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub championship: String,
    pub group_name: Option<String>,
    pub match_date: String,
    pub match_number: String,
    pub team_a: String,
    pub team_b: String,
    pub venue: Option<String>,
    pub kickoff_time: Option<String>,
}

impl From<refdesk_core::import::MatchRow> for NewMatch {
    fn from(row: refdesk_core::import::MatchRow) -> Self {
        Self {
            championship: row.championship,
            group_name: row.group_name,
            match_date: row.match_date,
            match_number: row.match_number,
            team_a: row.team_a,
            team_b: row.team_b,
            venue: row.venue,
            kickoff_time: row.kickoff_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Registration {
    pub id: String,
    pub user_id: String,
    pub match_id: String,
    pub role: String,
    pub arrival_time: String,
    pub notes: Option<String>,
    pub data_file: Option<String>,
    pub pdf_file: Option<String>,
    pub photo_file: Option<String>,
    pub submitted: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Artifact updates applied to a registration on end-of-match submission.
#[derive(Debug, Clone, Default)]
pub struct SubmissionUpdate {
    pub notes: Option<String>,
    pub data_file: Option<String>,
    pub pdf_file: Option<String>,
    pub photo_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ViewingConfirmation {
    pub match_id: String,
    pub user_id: String,
    pub confirmed_at: i64,
}

/// A registration joined with its match, for the caller's own listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RegistrationWithMatch {
    pub id: String,
    pub match_id: String,
    pub role: String,
    pub arrival_time: String,
    pub notes: Option<String>,
    pub data_file: Option<String>,
    pub pdf_file: Option<String>,
    pub photo_file: Option<String>,
    pub submitted: i64,
    pub championship: String,
    pub group_name: Option<String>,
    pub match_date: String,
    pub match_number: String,
    pub team_a: String,
    pub team_b: String,
    pub status: String,
    pub final_result: Option<String>,
}

/// One row of the administrative report: matches × registrations × users.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReportRow {
    pub match_id: String,
    pub championship: String,
    pub group_name: Option<String>,
    pub match_date: String,
    pub match_number: String,
    pub team_a: String,
    pub team_b: String,
    pub status: String,
    pub final_result: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub arrival_time: String,
    pub submitted: i64,
}

/// One submitted-artifact row for the advanced report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ArtifactRow {
    pub match_id: String,
    pub championship: String,
    pub match_date: String,
    pub match_number: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub data_file: Option<String>,
    pub pdf_file: Option<String>,
    pub photo_file: Option<String>,
}

/// Admin-editable user fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tax_code: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
    pub club: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub certified: Option<bool>,
}

/// Self-service profile fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tax_code: Option<String>,
    pub club: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

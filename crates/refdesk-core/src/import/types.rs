//! Row types for the tabular match import.

use serde::{Deserialize, Serialize};

/// One match row from an imported file.
///
/// Column order: championship, group, date, match number, team A, team B,
/// venue, kickoff time. The last two are optional; the rest are required
/// and validated by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRow {
    pub championship: String,
    pub group_name: Option<String>,
    pub match_date: String,
    pub match_number: String,
    pub team_a: String,
    pub team_b: String,
    pub venue: Option<String>,
    pub kickoff_time: Option<String>,
}

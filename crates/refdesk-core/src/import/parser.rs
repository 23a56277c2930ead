//! Parser for delimited match-import files.

use crate::error::{Error, Result};

use super::types::MatchRow;

/// Parse a whole import file into rows.
///
/// Returns one entry per non-empty data line: `Ok(MatchRow)` for parseable
/// lines, `Err` for malformed ones. A header line (first line mentioning
/// "championship" or "campionato") is skipped.
pub fn parse_file(content: &str) -> Vec<Result<MatchRow>> {
    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if idx == 0 && is_header(line) {
            continue;
        }
        rows.push(parse_row(line).map_err(|e| match e {
            Error::ImportParse(msg) => Error::ImportParse(format!("line {}: {msg}", idx + 1)),
            other => other,
        }));
    }
    rows
}

/// Parse a single delimited line into a match row.
///
/// The delimiter is sniffed per line: semicolon when present, comma
/// otherwise. Required columns: championship, date, match number, team A,
/// team B. Group, venue, and kickoff time may be empty or absent.
pub fn parse_row(line: &str) -> Result<MatchRow> {
    let delimiter = if line.contains(';') { ';' } else { ',' };
    let mut fields = line.split(delimiter).map(str::trim);

    let championship = required(fields.next(), "championship")?;
    let group_name = optional(fields.next());
    let match_date = required(fields.next(), "date")?;
    let match_number = required(fields.next(), "match number")?;
    let team_a = required(fields.next(), "team A")?;
    let team_b = required(fields.next(), "team B")?;
    let venue = optional(fields.next());
    let kickoff_time = optional(fields.next());

    Ok(MatchRow {
        championship,
        group_name,
        match_date,
        match_number,
        team_a,
        team_b,
        venue,
        kickoff_time,
    })
}

fn is_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("championship") || lower.contains("campionato")
}

fn required(field: Option<&str>, name: &str) -> Result<String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(Error::ImportParse(format!("missing {name}"))),
    }
}

fn optional(field: Option<&str>) -> Option<String> {
    field.filter(|v| !v.is_empty()).map(str::to_string)
}

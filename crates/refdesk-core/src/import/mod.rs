//! Tabular match-import parsing.
//!
//! This module parses delimited text (semicolon or comma separated) exported
//! from spreadsheet tooling into canonical match rows, implementing a
//! tolerant reader pattern: a malformed line yields a per-line error without
//! aborting the rest of the file.

mod parser;
mod types;

pub use parser::{parse_file, parse_row};
pub use types::MatchRow;

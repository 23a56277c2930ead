//! SQLite storage for the Refdesk server.
//!
//! Provides persistence for users, sessions, matches, registrations, and
//! viewing confirmations.

mod db;
mod models;
mod queries;
mod queries_reports;

#[cfg(test)]
mod tests;

pub use db::Database;
pub use models::*;

//! Error types for the Refdesk core library.

use thiserror::Error;

/// Result type alias using the Refdesk core Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Refdesk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Match import parsing error
    #[error("Failed to parse import row: {0}")]
    ImportParse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

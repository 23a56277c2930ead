//! Upload store for end-of-match artifact files.
//!
//! Artifacts are persisted under a content directory with a generated
//! unique name; only the stored filename travels back into the database.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ApiError;

#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist uploaded bytes and return the stored filename.
    ///
    /// The name is a fresh UUID plus the (sanitised) extension of the
    /// original filename; the original name itself is never trusted.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, ApiError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error("create upload directory", &e))?;

        let filename = match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{ext}", uuid::Uuid::new_v4()),
            None => uuid::Uuid::new_v4().to_string(),
        };

        tokio::fs::write(self.dir.join(&filename), bytes)
            .await
            .map_err(|e| storage_error("write artifact", &e))?;

        info!(filename = %filename, size = bytes.len(), "Artifact stored");
        Ok(filename)
    }
}

fn storage_error(what: &str, e: &std::io::Error) -> ApiError {
    tracing::error!(error = %e, "Failed to {what}");
    ApiError::Storage("Artifact storage failed".to_string())
}

/// Lowercased alphanumeric extension of the original name, capped at 8
/// characters; anything else is dropped.
fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_lowercase())
}

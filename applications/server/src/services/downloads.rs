//! Downloadable audio files - resolves request names inside the songs directory
use crate::error::{Result, ServerError};
use anuraagam_core::AudioFormat;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DownloadStore {
    base_path: PathBuf,
}

impl DownloadStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a requested file name to a file inside the songs directory
    ///
    /// Names are single path components. Anything that tries to climb out
    /// is a bad request; names that resolve to nothing (or to a directory)
    /// are not found.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0'])
        {
            return Err(ServerError::BadRequest("Invalid file name".to_string()));
        }

        let path = self.base_path.join(name);
        if !path.is_file() {
            return Err(not_found(name));
        }

        self.validate_path(&path)?;
        Ok(path)
    }

    /// Validate that a path is within the songs directory (symlinks included)
    pub fn validate_path(&self, path: &Path) -> Result<()> {
        let canonical_base = self
            .base_path
            .canonicalize()
            .map_err(|e| ServerError::NotFound(format!("Songs directory unavailable: {}", e)))?;

        let canonical_path = path
            .canonicalize()
            .map_err(|_| not_found(&path.display().to_string()))?;

        if !canonical_path.starts_with(&canonical_base) {
            tracing::warn!("Path traversal attempt detected: {:?}", path);
            return Err(ServerError::BadRequest("Invalid file name".to_string()));
        }

        Ok(())
    }
}

fn not_found(name: &str) -> ServerError {
    ServerError::NotFound(format!("File not found: {name}"))
}

/// Content type for a downloadable file
///
/// Formats the player knows get their canonical type (`.m4a` is
/// `audio/mp4`); everything else goes through extension guessing.
pub fn content_type(path: &Path) -> String {
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(AudioFormat::Unknown, AudioFormat::from_extension);

    match format {
        AudioFormat::Unknown => mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string(),
        known => known.mime_type().to_string(),
    }
}

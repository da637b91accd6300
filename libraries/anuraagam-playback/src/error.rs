//! Error types for playback control

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown to the listener whenever a track cannot be played
pub const LOAD_ERROR_MESSAGE: &str =
    "Failed to load audio. The file might be corrupted or unavailable.";

/// Playback errors
///
/// Media failures are never returned from controller operations; they are
/// recorded in the controller state and reported through events.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlaybackError {
    /// The media element could not load or decode the track
    #[error("Failed to load audio: {reason}")]
    Load {
        /// Backend-supplied detail (not shown to the listener)
        reason: String,
    },

    /// The track has no audio sources at all
    #[error("Track {track_id} has no playable sources")]
    NoSources {
        /// Track that was requested
        track_id: String,
    },

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,
}

impl PlaybackError {
    /// Create a load error
    pub fn load(reason: impl Into<String>) -> Self {
        Self::Load {
            reason: reason.into(),
        }
    }

    /// Error category, `load-error` for anything the media element rejected
    pub fn category(&self) -> &'static str {
        match self {
            Self::Load { .. } | Self::NoSources { .. } => "load-error",
            Self::NoTrackLoaded => "no-track",
        }
    }

    /// Text suitable for display in the player
    pub fn user_message(&self) -> String {
        match self {
            Self::Load { .. } | Self::NoSources { .. } => LOAD_ERROR_MESSAGE.to_string(),
            Self::NoTrackLoaded => self.to_string(),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failures_share_one_user_message() {
        let load = PlaybackError::load("decode failed");
        let empty = PlaybackError::NoSources {
            track_id: "7".to_string(),
        };

        assert_eq!(load.category(), "load-error");
        assert_eq!(empty.category(), "load-error");
        assert_eq!(load.user_message(), LOAD_ERROR_MESSAGE);
        assert_eq!(empty.user_message(), LOAD_ERROR_MESSAGE);
        assert!(load.to_string().contains("decode failed"));
    }
}

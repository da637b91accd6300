//! Core types for playback control

use anuraagam_core::Track;
use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// Playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    /// Nothing playing (no track, or the queue ran out)
    Stopped,

    /// Track requested, waiting for the media element
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// The media element failed; only a fresh play leaves this phase
    Errored,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    Off,

    /// Replay current track when it ends
    One,

    /// Loop entire queue
    All,
}

impl RepeatMode {
    /// Next mode in the off → one → all → off cycle
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }
}

/// Direction for queue navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Following track
    Next,

    /// Preceding track
    Previous,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Initial shuffle state (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// Owned copy of the controller state, for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Track currently loaded, if any
    pub track: Option<Track>,

    /// Current phase
    pub phase: PlaybackPhase,

    /// Position in seconds
    pub position: f64,

    /// Duration in seconds, once the media element reports it
    pub duration: Option<f64>,

    /// Volume level (0.0-1.0), kept while muted
    pub volume: f32,

    /// Whether output is muted
    pub muted: bool,

    /// Whether next/previous pick random tracks
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,

    /// Last playback failure, cleared by the next play
    pub error: Option<PlaybackError>,
}

impl PlaybackSnapshot {
    /// User-facing error text, if the last load failed
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(PlaybackError::user_message)
    }
}

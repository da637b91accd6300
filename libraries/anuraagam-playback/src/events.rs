//! Playback events
//!
//! Two directions of traffic:
//! - `MediaEvent`: lifecycle notifications reported by the media element
//!   (loaded, playing, paused, time update, ended, error)
//! - `PlaybackEvent`: changes the controller queues for the UI to drain
//!
//! How a media event moves the controller is decided by [`transition`], a
//! pure (phase, event) table.

use anuraagam_core::TrackId;
use serde::{Deserialize, Serialize};

use crate::types::{PlaybackPhase, RepeatMode};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Phase changed (playing, paused, stopped, etc.)
    StateChanged {
        /// The new phase
        phase: PlaybackPhase,
    },

    /// A different track became current
    TrackChanged {
        /// ID of the new track (`None` after stop)
        track_id: Option<TrackId>,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Position or duration changed
    PositionChanged {
        /// Position in seconds
        position: f64,
        /// Duration in seconds, if known
        duration: Option<f64>,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Volume level (0.0-1.0)
        volume: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// New mode
        repeat: RepeatMode,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// Whether shuffle is now on
        enabled: bool,
    },

    /// Playback failed
    Error {
        /// User-facing message
        message: String,
    },
}

/// Lifecycle notification from the media element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEvent {
    /// Track the notification belongs to
    pub track_id: TrackId,

    /// What happened
    pub kind: MediaEventKind,
}

impl MediaEvent {
    /// Create a new media event
    pub fn new(track_id: TrackId, kind: MediaEventKind) -> Self {
        Self { track_id, kind }
    }
}

/// Kind of media lifecycle notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEventKind {
    /// Metadata loaded
    Loaded {
        /// Duration in seconds
        duration: f64,
    },

    /// Playback actually started or resumed
    Playing,

    /// Playback paused
    Paused,

    /// Periodic time update
    TimeUpdate {
        /// Position in seconds
        position: f64,
        /// Duration in seconds, if the element knows it
        duration: Option<f64>,
    },

    /// Reached the end of the track
    Ended,

    /// Loading or decoding failed
    Error {
        /// Backend detail
        message: String,
    },
}

/// What the controller should do in response to a media event
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Event does not apply in this phase
    Ignore,

    /// Record the track duration
    RecordDuration(f64),

    /// Move to playing
    EnterPlaying,

    /// Move to paused
    EnterPaused,

    /// Record position; `begin` also ends the loading phase
    UpdatePosition {
        /// Position in seconds
        position: f64,
        /// Duration in seconds, if reported
        duration: Option<f64>,
        /// Whether this update marks playback as started
        begin: bool,
    },

    /// Replay the current track from the start
    Replay,

    /// Move to the next track, or stop if there is none
    AdvanceOrStop,

    /// Enter the errored phase
    Fail(String),
}

/// Transition table: how `kind` moves a controller sitting in `phase`.
///
/// Stopped and errored controllers ignore every media event; they only
/// leave those phases through a fresh play.
pub fn transition(phase: PlaybackPhase, kind: &MediaEventKind, repeat: RepeatMode) -> Transition {
    use MediaEventKind as K;
    use PlaybackPhase as P;

    match (phase, kind) {
        (P::Stopped | P::Errored, _) => Transition::Ignore,

        (_, K::Loaded { duration }) => Transition::RecordDuration(*duration),

        (P::Loading | P::Paused, K::Playing) => Transition::EnterPlaying,
        (P::Playing, K::Playing) => Transition::Ignore,

        (P::Playing, K::Paused) => Transition::EnterPaused,
        (P::Loading | P::Paused, K::Paused) => Transition::Ignore,

        (_, K::TimeUpdate { position, duration }) => Transition::UpdatePosition {
            position: *position,
            duration: *duration,
            begin: phase == P::Loading,
        },

        (_, K::Ended) if repeat == RepeatMode::One => Transition::Replay,
        (_, K::Ended) => Transition::AdvanceOrStop,

        (_, K::Error { message }) => Transition::Fail(message.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_and_errored_ignore_everything() {
        for phase in [PlaybackPhase::Stopped, PlaybackPhase::Errored] {
            assert_eq!(
                transition(phase, &MediaEventKind::Playing, RepeatMode::Off),
                Transition::Ignore
            );
            assert_eq!(
                transition(phase, &MediaEventKind::Ended, RepeatMode::One),
                Transition::Ignore
            );
        }
    }

    #[test]
    fn time_update_begins_playback_while_loading() {
        let kind = MediaEventKind::TimeUpdate {
            position: 0.5,
            duration: None,
        };
        assert_eq!(
            transition(PlaybackPhase::Loading, &kind, RepeatMode::Off),
            Transition::UpdatePosition {
                position: 0.5,
                duration: None,
                begin: true
            }
        );
        assert!(matches!(
            transition(PlaybackPhase::Playing, &kind, RepeatMode::Off),
            Transition::UpdatePosition { begin: false, .. }
        ));
    }

    #[test]
    fn ended_respects_repeat_one() {
        assert_eq!(
            transition(PlaybackPhase::Playing, &MediaEventKind::Ended, RepeatMode::One),
            Transition::Replay
        );
        assert_eq!(
            transition(PlaybackPhase::Playing, &MediaEventKind::Ended, RepeatMode::All),
            Transition::AdvanceOrStop
        );
    }

    #[test]
    fn pause_only_applies_while_playing() {
        assert_eq!(
            transition(PlaybackPhase::Playing, &MediaEventKind::Paused, RepeatMode::Off),
            Transition::EnterPaused
        );
        assert_eq!(
            transition(PlaybackPhase::Loading, &MediaEventKind::Paused, RepeatMode::Off),
            Transition::Ignore
        );
    }
}

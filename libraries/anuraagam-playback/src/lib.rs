//! Anuraagam - Playback Control
//!
//! Platform-agnostic playback state machine for the Anuraagam player.
//!
//! This crate provides:
//! - Play/pause/stop with an explicit phase machine
//!   (stopped, loading, playing, paused, errored)
//! - Seek and relative skip, clamped to the track
//! - Volume (linear 0.0-1.0) with mute
//! - Shuffle (random pick, never the current track) and repeat (Off, One, All)
//! - Next/previous over a read-only queue snapshot
//! - Media lifecycle events with a stale-load guard
//!
//! # Architecture
//!
//! `anuraagam-playback` never touches audio itself. The platform media
//! element is reached through the [`MediaBackend`] trait, and the element's
//! notifications come back as [`MediaEvent`]s.
//!
//! # Example
//!
//! ```rust
//! use anuraagam_core::{AudioFormat, AudioSource, Track, TrackId};
//! use anuraagam_playback::{
//!     Direction, MediaBackend, MediaEvent, MediaEventKind, PlaybackConfig, PlaybackController,
//!     PlaybackPhase, Result,
//! };
//!
//! // Implement MediaBackend for your platform
//! struct Silent;
//!
//! impl MediaBackend for Silent {
//!     fn load(&mut self, _id: &TrackId, _sources: &[AudioSource]) -> Result<()> {
//!         Ok(())
//!     }
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _seconds: f64) {}
//!     fn set_volume(&mut self, _volume: f32) {}
//! }
//!
//! let tracks: Vec<Track> = (1..=3)
//!     .map(|i| {
//!         Track::new(TrackId::from(i), format!("Song {i}"), "Artist")
//!             .with_source(AudioSource::new(format!("/download/{i}.mp3"), AudioFormat::Mp3))
//!     })
//!     .collect();
//!
//! let mut controller = PlaybackController::new(Silent, PlaybackConfig::default());
//! controller.play(tracks[0].clone(), tracks.clone());
//! assert_eq!(controller.phase(), PlaybackPhase::Loading);
//!
//! // The media element reports that playback started
//! controller.handle_event(MediaEvent::new(TrackId::from(1), MediaEventKind::Playing));
//! assert_eq!(controller.phase(), PlaybackPhase::Playing);
//!
//! controller.advance(Direction::Next);
//! assert_eq!(controller.current_track().unwrap().id, TrackId::from(2));
//! ```

mod backend;
mod controller;
mod error;
pub mod events;
mod queue;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use backend::MediaBackend;
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result, LOAD_ERROR_MESSAGE};
pub use events::{MediaEvent, MediaEventKind, PlaybackEvent};
pub use queue::Queue;
pub use shuffle::random_index_excluding;
pub use types::{Direction, PlaybackConfig, PlaybackPhase, PlaybackSnapshot, RepeatMode};
pub use volume::Volume;

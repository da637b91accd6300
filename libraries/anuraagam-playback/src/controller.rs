//! Playback controller
//!
//! Owns the playback state and drives a [`MediaBackend`]. Every user intent
//! (play, seek, next, ...) and every media notification goes through here;
//! the UI renders from [`PlaybackController::snapshot`] and drains
//! [`PlaybackEvent`]s to learn what changed.

use anuraagam_core::{Track, TrackId};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::backend::MediaBackend;
use crate::error::{PlaybackError, Result};
use crate::events::{transition, MediaEvent, PlaybackEvent, Transition};
use crate::queue::Queue;
use crate::shuffle::random_index_excluding;
use crate::types::{Direction, PlaybackConfig, PlaybackPhase, PlaybackSnapshot, RepeatMode};
use crate::volume::Volume;

/// Playback controller
///
/// Single-threaded and synchronous: commands go to the backend immediately,
/// results come back later through [`handle_event`](Self::handle_event).
pub struct PlaybackController<B: MediaBackend> {
    backend: B,

    queue: Queue,
    current_track: Option<Track>,
    phase: PlaybackPhase,
    position: f64,
    duration: Option<f64>,
    last_error: Option<PlaybackError>,

    volume: Volume,
    shuffle: bool,
    repeat: RepeatMode,

    // Source of shuffle picks; replaceable for deterministic tests
    rng: Box<dyn RngCore>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<B: MediaBackend> PlaybackController<B> {
    /// Create a new controller around `backend`
    pub fn new(mut backend: B, config: PlaybackConfig) -> Self {
        let volume = Volume::new(config.volume);
        backend.set_volume(volume.gain());

        Self {
            backend,
            queue: Queue::new(),
            current_track: None,
            phase: PlaybackPhase::Stopped,
            position: 0.0,
            duration: None,
            last_error: None,
            volume,
            shuffle: config.shuffle,
            repeat: config.repeat,
            rng: Box::new(StdRng::from_entropy()),
            pending_events: Vec::new(),
        }
    }

    /// Replace the random source used for shuffle picks
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    // ===== Playback Control =====

    /// Play `track`, using `queue` for later next/previous.
    ///
    /// Always enters the loading phase. A track without sources, or one the
    /// backend refuses, lands in the errored phase instead of failing here.
    pub fn play(&mut self, track: Track, queue: impl Into<Queue>) {
        self.queue = queue.into();
        self.start(track);
    }

    /// Replace the queue without touching the current track
    pub fn set_queue(&mut self, queue: impl Into<Queue>) {
        self.queue = queue.into();
    }

    /// Pause when playing (or loading), resume when paused.
    ///
    /// A stopped controller that still holds a track restarts it from the
    /// beginning. Errored controllers and empty controllers ignore this.
    pub fn toggle_play_pause(&mut self) {
        match self.phase {
            PlaybackPhase::Playing | PlaybackPhase::Loading => {
                self.backend.pause();
                self.set_phase(PlaybackPhase::Paused);
            }
            PlaybackPhase::Paused => {
                self.backend.play();
                self.set_phase(PlaybackPhase::Playing);
            }
            PlaybackPhase::Stopped => {
                if self.current_track.is_some() {
                    self.rewind();
                    self.set_phase(PlaybackPhase::Loading);
                }
            }
            PlaybackPhase::Errored => {}
        }
    }

    /// Restart the current track from position 0 and keep playing
    pub fn restart(&mut self) -> Result<()> {
        if self.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.rewind();
        self.set_phase(PlaybackPhase::Playing);
        Ok(())
    }

    /// Stop playback and clear the current track (the queue is kept)
    pub fn stop(&mut self) {
        self.backend.pause();

        if let Some(track) = self.current_track.take() {
            self.emit_track_changed(None, Some(track.id));
        }
        self.position = 0.0;
        self.duration = None;
        self.last_error = None;
        self.emit_position();
        self.set_phase(PlaybackPhase::Stopped);
    }

    /// Seek to `seconds`, clamped into the track.
    ///
    /// Non-finite input and calls without a current track are ignored.
    pub fn seek(&mut self, seconds: f64) {
        if self.current_track.is_none() || !seconds.is_finite() {
            return;
        }

        self.position = self.clamp_position(seconds);
        self.backend.seek(self.position);
        self.emit_position();
    }

    /// Seek relative to the current position
    pub fn skip(&mut self, delta_seconds: f64) {
        if !delta_seconds.is_finite() {
            return;
        }
        self.seek(self.position + delta_seconds);
    }

    // ===== Navigation =====

    /// Move to the next or previous track.
    ///
    /// No-op when there is nowhere to go (end of queue without repeat,
    /// shuffle over a single track).
    pub fn advance(&mut self, direction: Direction) {
        let Some(index) = self.target_index(direction) else {
            tracing::debug!(?direction, "No track to advance to");
            return;
        };

        if let Some(track) = self.queue.get(index).cloned() {
            self.start(track);
        }
    }

    /// Cycle repeat mode: off → one → all → off
    pub fn cycle_repeat(&mut self) {
        self.repeat = self.repeat.cycle();
        self.pending_events.push(PlaybackEvent::RepeatChanged {
            repeat: self.repeat,
        });
    }

    /// Toggle shuffle
    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        self.pending_events.push(PlaybackEvent::ShuffleChanged {
            enabled: self.shuffle,
        });
    }

    // ===== Volume =====

    /// Set volume (clamped to 0.0-1.0); raising it above zero unmutes
    pub fn set_volume(&mut self, volume: f32) {
        if self.volume.set_level(volume) {
            self.push_volume();
        }
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.push_volume();
    }

    // ===== Media Events =====

    /// Apply a notification from the media element.
    ///
    /// Notifications for any track other than the current one are stale
    /// (an earlier load finishing late) and are dropped.
    ///
    /// The check is on track identity only. When the same track is loaded
    /// again (replayed after another track, or a one-track queue wrapping
    /// under repeat-all), a late notification from its earlier load is
    /// indistinguishable from the new one and is applied.
    pub fn handle_event(&mut self, event: MediaEvent) {
        let is_current = self
            .current_track
            .as_ref()
            .is_some_and(|t| t.id == event.track_id);
        if !is_current {
            tracing::debug!(track_id = %event.track_id, kind = ?event.kind, "Ignoring stale media event");
            return;
        }

        match transition(self.phase, &event.kind, self.repeat) {
            Transition::Ignore => {}
            Transition::RecordDuration(duration) => {
                self.record_duration(Some(duration));
                self.emit_position();
            }
            Transition::EnterPlaying => self.set_phase(PlaybackPhase::Playing),
            Transition::EnterPaused => self.set_phase(PlaybackPhase::Paused),
            Transition::UpdatePosition {
                position,
                duration,
                begin,
            } => {
                self.record_duration(duration);
                if position.is_finite() {
                    self.position = self.clamp_position(position);
                }
                self.emit_position();
                if begin {
                    self.set_phase(PlaybackPhase::Playing);
                }
            }
            Transition::Replay => {
                self.rewind();
                self.set_phase(PlaybackPhase::Playing);
            }
            Transition::AdvanceOrStop => {
                if let Some(track) = self
                    .target_index(Direction::Next)
                    .and_then(|i| self.queue.get(i).cloned())
                {
                    self.start(track);
                } else {
                    self.set_phase(PlaybackPhase::Stopped);
                }
            }
            Transition::Fail(message) => self.fail(PlaybackError::load(message)),
        }
    }

    // ===== State Queries =====

    /// Owned copy of the current state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            track: self.current_track.clone(),
            phase: self.phase,
            position: self.position,
            duration: self.duration,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            shuffle: self.shuffle,
            repeat: self.repeat,
            error: self.last_error.clone(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Current track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Position in seconds
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Queue next/previous are computed from
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Last playback failure
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    /// Volume the backend is currently told to use
    pub fn effective_volume(&self) -> f32 {
        self.volume.gain()
    }

    /// The media backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The media backend, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn start(&mut self, track: Track) {
        let previous = self.current_track.as_ref().map(|t| t.id.clone());
        if previous.as_ref() != Some(&track.id) {
            self.emit_track_changed(Some(track.id.clone()), previous);
        }

        tracing::debug!(track_id = %track.id, title = %track.title, "Loading track");

        let id: TrackId = track.id.clone();
        let sources = track.sources.clone();
        self.current_track = Some(track);
        self.position = 0.0;
        self.duration = None;
        self.last_error = None;
        self.emit_position();
        self.set_phase(PlaybackPhase::Loading);

        if sources.is_empty() {
            self.fail(PlaybackError::NoSources {
                track_id: id.to_string(),
            });
            return;
        }

        match self.backend.load(&id, &sources) {
            Ok(()) => self.backend.play(),
            Err(e) => self.fail(e),
        }
    }

    fn target_index(&mut self, direction: Direction) -> Option<usize> {
        let current = self
            .current_track
            .as_ref()
            .and_then(|t| self.queue.position_of(&t.id));

        if self.shuffle {
            return random_index_excluding(&mut self.rng, self.queue.len(), current);
        }

        match direction {
            Direction::Next => self.queue.next_index(current, self.repeat),
            Direction::Previous => self.queue.previous_index(current, self.repeat),
        }
    }

    fn rewind(&mut self) {
        self.position = 0.0;
        self.backend.seek(0.0);
        self.backend.play();
        self.emit_position();
    }

    fn fail(&mut self, error: PlaybackError) {
        tracing::warn!(error = %error, "Playback failed");
        let message = error.user_message();
        self.last_error = Some(error);
        self.set_phase(PlaybackPhase::Errored);
        self.pending_events.push(PlaybackEvent::Error { message });
    }

    fn record_duration(&mut self, duration: Option<f64>) {
        if let Some(d) = duration.filter(|d| d.is_finite() && *d > 0.0) {
            self.duration = Some(d);
            self.position = self.clamp_position(self.position);
        }
    }

    fn clamp_position(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        match self.duration {
            Some(d) => seconds.min(d),
            None => seconds,
        }
    }

    fn set_phase(&mut self, phase: PlaybackPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.pending_events
                .push(PlaybackEvent::StateChanged { phase });
        }
    }

    fn push_volume(&mut self) {
        self.backend.set_volume(self.volume.gain());
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    fn emit_position(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionChanged {
            position: self.position,
            duration: self.duration,
        });
    }

    fn emit_track_changed(&mut self, track_id: Option<TrackId>, previous_track_id: Option<TrackId>) {
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id,
            previous_track_id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;
    use crate::events::MediaEventKind;
    use anuraagam_core::{AudioFormat, AudioSource};

    fn track(id: u64) -> Track {
        Track::new(TrackId::from(id), format!("Song {id}"), "Artist").with_source(
            AudioSource::new(format!("/download/{id}.mp3"), AudioFormat::Mp3),
        )
    }

    fn controller() -> PlaybackController<DummyBackend> {
        PlaybackController::new(DummyBackend::default(), PlaybackConfig::default())
    }

    #[test]
    fn starts_stopped_without_track() {
        let c = controller();
        let snap = c.snapshot();
        assert_eq!(snap.phase, PlaybackPhase::Stopped);
        assert!(snap.track.is_none());
        assert_eq!(snap.volume, 1.0);
        assert_eq!(c.backend().volume, 1.0);
    }

    #[test]
    fn play_enters_loading_and_starts_backend() {
        let mut c = controller();
        c.play(track(1), vec![track(1), track(2)]);

        assert_eq!(c.phase(), PlaybackPhase::Loading);
        assert_eq!(c.backend().loads, vec![TrackId::from(1)]);
        assert!(c.backend().playing);
    }

    #[test]
    fn backend_load_failure_is_recorded() {
        let mut backend = DummyBackend::default();
        backend.fail_loads = true;
        let mut c = PlaybackController::new(backend, PlaybackConfig::default());

        c.play(track(1), vec![track(1)]);

        assert_eq!(c.phase(), PlaybackPhase::Errored);
        assert_eq!(c.last_error().map(PlaybackError::category), Some("load-error"));
    }

    #[test]
    fn toggle_while_loading_pauses() {
        let mut c = controller();
        c.play(track(1), vec![track(1)]);
        c.toggle_play_pause();

        assert_eq!(c.phase(), PlaybackPhase::Paused);
        assert!(!c.backend().playing);
    }

    #[test]
    fn restart_without_track_fails() {
        let mut c = controller();
        assert_eq!(c.restart(), Err(PlaybackError::NoTrackLoaded));
    }

    #[test]
    fn restart_rewinds_and_plays() {
        let mut c = controller();
        c.play(track(1), vec![track(1)]);
        c.handle_event(MediaEvent::new(
            TrackId::from(1),
            MediaEventKind::Loaded { duration: 200.0 },
        ));
        c.handle_event(MediaEvent::new(TrackId::from(1), MediaEventKind::Playing));
        c.seek(42.0);
        c.toggle_play_pause();
        assert_eq!(c.phase(), PlaybackPhase::Paused);
        c.drain_events();

        assert_eq!(c.restart(), Ok(()));

        assert_eq!(c.position(), 0.0);
        assert_eq!(c.phase(), PlaybackPhase::Playing);
        assert_eq!(c.backend().position, 0.0);
        assert!(c.backend().playing);
        assert_eq!(c.backend().loads, vec![TrackId::from(1)]);

        let events = c.drain_events();
        assert!(events.contains(&PlaybackEvent::StateChanged {
            phase: PlaybackPhase::Playing
        }));
        assert!(events.contains(&PlaybackEvent::PositionChanged {
            position: 0.0,
            duration: Some(200.0),
        }));
    }

    #[test]
    fn media_events_are_matched_by_track_identity() {
        let mut c = controller();
        let queue = vec![track(1), track(2)];
        c.play(track(1), queue.clone());
        c.play(track(2), queue.clone());

        // Late notification from the first track
        c.handle_event(MediaEvent::new(TrackId::from(1), MediaEventKind::Ended));
        assert_eq!(c.current_track().map(|t| t.id.clone()), Some(TrackId::from(2)));
        assert_eq!(c.phase(), PlaybackPhase::Loading);

        // Once track 1 is current again, its notifications apply
        c.play(track(1), queue);
        c.handle_event(MediaEvent::new(TrackId::from(1), MediaEventKind::Playing));
        assert_eq!(c.phase(), PlaybackPhase::Playing);
        c.handle_event(MediaEvent::new(TrackId::from(1), MediaEventKind::Ended));
        assert_eq!(c.current_track().map(|t| t.id.clone()), Some(TrackId::from(2)));
    }

    #[test]
    fn stop_clears_track_and_emits() {
        let mut c = controller();
        c.play(track(1), vec![track(1)]);
        c.handle_event(MediaEvent::new(TrackId::from(1), MediaEventKind::Playing));
        c.drain_events();

        c.stop();

        assert!(c.current_track().is_none());
        assert_eq!(c.phase(), PlaybackPhase::Stopped);
        assert!(c.drain_events().contains(&PlaybackEvent::TrackChanged {
            track_id: None,
            previous_track_id: Some(TrackId::from(1)),
        }));
    }
}

//! Media backend trait
//!
//! Abstracts the platform media element (an HTML audio element in a web
//! client, a native player elsewhere). The backend reports progress back to
//! the controller as [`MediaEvent`](crate::MediaEvent)s.

use anuraagam_core::{AudioSource, TrackId};

use crate::error::Result;

/// Platform media element
///
/// Implementors only perform commands; all state lives in
/// [`PlaybackController`](crate::PlaybackController).
pub trait MediaBackend {
    /// Load a track. `sources` is ordered by preference and never empty.
    ///
    /// Returning an error puts the controller into the errored phase.
    /// Asynchronous failures are reported later through a media error event.
    fn load(&mut self, track_id: &TrackId, sources: &[AudioSource]) -> Result<()>;

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Jump to `seconds` from the start of the track
    fn seek(&mut self, seconds: f64);

    /// Set output volume (0.0-1.0, already 0 when muted)
    fn set_volume(&mut self, volume: f32);
}

impl<T: MediaBackend + ?Sized> MediaBackend for Box<T> {
    fn load(&mut self, track_id: &TrackId, sources: &[AudioSource]) -> Result<()> {
        (**self).load(track_id, sources)
    }

    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds);
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume);
    }
}

/// Backend that records the commands it receives
#[cfg(test)]
#[derive(Debug, Default)]
pub struct DummyBackend {
    pub loads: Vec<TrackId>,
    pub playing: bool,
    pub position: f64,
    pub volume: f32,
    pub fail_loads: bool,
}

#[cfg(test)]
impl MediaBackend for DummyBackend {
    fn load(&mut self, track_id: &TrackId, _sources: &[AudioSource]) -> Result<()> {
        if self.fail_loads {
            return Err(crate::error::PlaybackError::load("unsupported format"));
        }
        self.loads.push(track_id.clone());
        self.position = 0.0;
        Ok(())
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

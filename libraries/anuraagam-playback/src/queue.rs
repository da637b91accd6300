//! Playback queue
//!
//! The presentation layer rebuilds the queue whenever the list on screen
//! changes (catalog results, playlist, favorites). The controller only
//! reads it, so it is held as a cheap shared snapshot.

use anuraagam_core::{Track, TrackId};
use std::sync::Arc;

use crate::types::RepeatMode;

/// Immutable ordered list of tracks next/previous are computed from
#[derive(Debug, Clone)]
pub struct Queue {
    tracks: Arc<[Track]>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self {
            tracks: Arc::from(Vec::new()),
        }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the first track with `id`
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Index after `current`.
    ///
    /// A track that is not in the queue (`None`) is treated as sitting just
    /// before the first track. Past the end only `RepeatMode::All` wraps.
    pub fn next_index(&self, current: Option<usize>, repeat: RepeatMode) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let candidate = current.map_or(0, |i| i + 1);
        if candidate < self.len() {
            Some(candidate)
        } else if repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// Index before `current`; only `RepeatMode::All` wraps to the last track.
    pub fn previous_index(&self, current: Option<usize>, repeat: RepeatMode) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        match current {
            Some(i) if i > 0 => Some(i - 1),
            _ if repeat == RepeatMode::All => Some(self.len() - 1),
            _ => None,
        }
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Track>> for Queue {
    fn from(tracks: Vec<Track>) -> Self {
        Self {
            tracks: Arc::from(tracks),
        }
    }
}

impl From<&[Track]> for Queue {
    fn from(tracks: &[Track]) -> Self {
        Self {
            tracks: Arc::from(tracks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(n: u64) -> Queue {
        (1..=n)
            .map(|i| Track::new(TrackId::from(i), format!("Song {i}"), "Artist"))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn next_stops_at_end_without_repeat() {
        let q = queue(3);
        assert_eq!(q.next_index(Some(0), RepeatMode::Off), Some(1));
        assert_eq!(q.next_index(Some(2), RepeatMode::Off), None);
        assert_eq!(q.next_index(Some(2), RepeatMode::One), None);
        assert_eq!(q.next_index(Some(2), RepeatMode::All), Some(0));
    }

    #[test]
    fn previous_wraps_only_with_repeat_all() {
        let q = queue(3);
        assert_eq!(q.previous_index(Some(1), RepeatMode::Off), Some(0));
        assert_eq!(q.previous_index(Some(0), RepeatMode::Off), None);
        assert_eq!(q.previous_index(Some(0), RepeatMode::All), Some(2));
    }

    #[test]
    fn track_outside_queue_starts_from_first() {
        let q = queue(3);
        assert_eq!(q.next_index(None, RepeatMode::Off), Some(0));
        assert_eq!(q.previous_index(None, RepeatMode::Off), None);
        assert_eq!(q.previous_index(None, RepeatMode::All), Some(2));
    }

    #[test]
    fn empty_queue_has_no_neighbours() {
        let q = Queue::new();
        assert_eq!(q.next_index(None, RepeatMode::All), None);
        assert_eq!(q.previous_index(None, RepeatMode::All), None);
    }

    #[test]
    fn position_uses_track_id() {
        let q = queue(3);
        assert_eq!(q.position_of(&TrackId::new("2")), Some(1));
        assert_eq!(q.position_of(&TrackId::new("9")), None);
    }
}

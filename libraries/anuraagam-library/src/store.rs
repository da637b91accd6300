//! Playlist and favorites
//!
//! Both are ordered sets of tracks keyed by `TrackId`. Every mutation
//! rewrites the whole set under its key; the sets are read once, when the
//! store is loaded.

use anuraagam_core::{Track, TrackId};

use crate::error::Result;
use crate::kv::{get_json, set_json, KeyValueStore, KEY_FAVORITES, KEY_PLAYLIST};

/// Ordered, deduplicated collection of tracks
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSet {
    key: &'static str,
    tracks: Vec<Track>,
}

impl TrackSet {
    /// Create an empty set persisted under `key`
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            tracks: Vec::new(),
        }
    }

    /// Build a set from stored tracks, dropping later duplicates
    pub fn from_tracks(key: &'static str, tracks: Vec<Track>) -> Self {
        let mut set = Self::new(key);
        for track in tracks {
            set.insert(track);
        }
        set
    }

    /// Storage key
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Append `track` unless its id is already present
    pub fn insert(&mut self, track: Track) -> bool {
        if self.contains(&track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Remove the track with `id`
    pub fn remove(&mut self, id: &TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| &t.id != id);
        self.tracks.len() != before
    }

    /// Remove every track
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Check membership by id
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == id)
    }

    /// Tracks in insertion order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn persist(&self, kv: &mut dyn KeyValueStore) -> Result<()> {
        set_json(kv, self.key, &self.tracks)
    }

    fn load(kv: &dyn KeyValueStore, key: &'static str) -> Self {
        match get_json::<Vec<Track>>(kv, key) {
            Ok(Some(tracks)) => Self::from_tracks(key, tracks),
            Ok(None) => Self::new(key),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored track list is unreadable, starting empty");
                Self::new(key)
            }
        }
    }
}

/// Playlist and favorites over a key-value backend
///
/// The two sets are independent; a failed write to one never rolls back
/// the other.
#[derive(Debug)]
pub struct LibraryStore<S: KeyValueStore> {
    kv: S,
    playlist: TrackSet,
    favorites: TrackSet,
}

impl<S: KeyValueStore> LibraryStore<S> {
    /// Load both sets from `kv`.
    ///
    /// Missing or corrupt entries load as empty sets.
    pub fn load(kv: S) -> Self {
        let playlist = TrackSet::load(&kv, KEY_PLAYLIST);
        let favorites = TrackSet::load(&kv, KEY_FAVORITES);
        tracing::debug!(
            playlist = playlist.len(),
            favorites = favorites.len(),
            "Loaded library"
        );
        Self {
            kv,
            playlist,
            favorites,
        }
    }

    /// Current playlist
    pub fn playlist(&self) -> &TrackSet {
        &self.playlist
    }

    /// Current favorites
    pub fn favorites(&self) -> &TrackSet {
        &self.favorites
    }

    /// Add to the playlist; returns `false` if it was already there
    pub fn add_to_playlist(&mut self, track: Track) -> Result<bool> {
        let inserted = self.playlist.insert(track);
        self.playlist.persist(&mut self.kv)?;
        Ok(inserted)
    }

    /// Remove from the playlist
    pub fn remove_from_playlist(&mut self, id: &TrackId) -> Result<bool> {
        let removed = self.playlist.remove(id);
        self.playlist.persist(&mut self.kv)?;
        Ok(removed)
    }

    /// Empty the playlist
    pub fn clear_playlist(&mut self) -> Result<()> {
        self.playlist.clear();
        self.playlist.persist(&mut self.kv)
    }

    /// Add to favorites; returns `false` if it was already there
    pub fn add_favorite(&mut self, track: Track) -> Result<bool> {
        let inserted = self.favorites.insert(track);
        self.favorites.persist(&mut self.kv)?;
        Ok(inserted)
    }

    /// Remove from favorites
    pub fn remove_favorite(&mut self, id: &TrackId) -> Result<bool> {
        let removed = self.favorites.remove(id);
        self.favorites.persist(&mut self.kv)?;
        Ok(removed)
    }

    /// Heart button: add if absent, remove if present. Returns whether the
    /// track is a favorite afterwards.
    pub fn toggle_favorite(&mut self, track: Track) -> Result<bool> {
        if self.favorites.contains(&track.id) {
            self.remove_favorite(&track.id)?;
            Ok(false)
        } else {
            self.add_favorite(track)?;
            Ok(true)
        }
    }

    /// Check whether `id` is a favorite
    pub fn is_favorite(&self, id: &TrackId) -> bool {
        self.favorites.contains(id)
    }

    /// Give back the backend
    pub fn into_inner(self) -> S {
        self.kv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKeyValueStore;

    fn track(id: u64) -> Track {
        Track::new(TrackId::from(id), format!("Song {id}"), "Artist")
    }

    #[test]
    fn insert_is_idempotent() {
        let mut set = TrackSet::new(KEY_PLAYLIST);
        assert!(set.insert(track(1)));
        assert!(!set.insert(track(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn from_tracks_drops_duplicates_keeping_first() {
        let mut renamed = track(1);
        renamed.title = "Other".to_string();
        let set = TrackSet::from_tracks(KEY_PLAYLIST, vec![track(1), track(2), renamed]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.tracks()[0].title, "Song 1");
    }

    #[test]
    fn mutations_persist_immediately() {
        let mut store = LibraryStore::load(MemoryKeyValueStore::new());
        store.add_to_playlist(track(1)).unwrap();
        store.add_to_playlist(track(2)).unwrap();
        store.add_favorite(track(2)).unwrap();
        store.remove_from_playlist(&TrackId::from(1)).unwrap();

        let reloaded = LibraryStore::load(store.into_inner());
        let ids: Vec<_> = reloaded
            .playlist()
            .tracks()
            .iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(ids, vec!["2"]);
        assert!(reloaded.is_favorite(&TrackId::from(2)));
    }

    #[test]
    fn clear_only_touches_playlist() {
        let mut store = LibraryStore::load(MemoryKeyValueStore::new());
        store.add_to_playlist(track(1)).unwrap();
        store.add_favorite(track(1)).unwrap();

        store.clear_playlist().unwrap();

        assert!(store.playlist().is_empty());
        assert_eq!(store.favorites().len(), 1);
    }

    #[test]
    fn toggle_favorite_flips_membership() {
        let mut store = LibraryStore::load(MemoryKeyValueStore::new());
        assert!(store.toggle_favorite(track(5)).unwrap());
        assert!(!store.toggle_favorite(track(5)).unwrap());
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn corrupt_entry_loads_empty() {
        let mut kv = MemoryKeyValueStore::new();
        kv.set(KEY_PLAYLIST, "{not json").unwrap();
        kv.set(KEY_FAVORITES, r#"[{"id": 101, "title": "Butta Bomma"}]"#)
            .unwrap();

        let store = LibraryStore::load(kv);
        assert!(store.playlist().is_empty());
        assert!(store.is_favorite(&TrackId::from(101)));
    }
}

//! Catalog provider
//!
//! The built-in demo list covers six languages; a local upload directory
//! can be appended with [`Catalog::with_local`]. Lookups return owned
//! snapshots in catalog order.

use anuraagam_core::{AudioSource, Track, TrackId};
use std::path::Path;

use crate::discovery::{LocalDiscovery, DEFAULT_COVER};

const PREVIEW_BASE: &str =
    "https://files.freemusicarchive.org/storage-freemusicarchive-org/music/no_curator/Komiku/Best_Off";

// (id, title, artist, album, language, preview file)
const DEMO_TRACKS: &[(u64, &str, &str, &str, &str, &str)] = &[
    (101, "Butta Bomma", "Armaan Malik", "Ala Vaikunthapurramuloo", "Telugu", "Komiku_-_01_-_Battle_of_Pogs.mp3"),
    (102, "Samajavaragamana", "Sid Sriram", "Ala Vaikunthapurramuloo", "Telugu", "Komiku_-_02_-_Friends.mp3"),
    (103, "Vachindamma", "Sid Sriram", "Geetha Govindam", "Telugu", "Komiku_-_13_-_Level_14.mp3"),
    (104, "Telugu Folk", "Komiku", "Best Off", "Telugu", "Komiku_-_19_-_Level_20.mp3"),
    (201, "Tum Hi Ho", "Arijit Singh", "Aashiqui 2", "Hindi", "Komiku_-_03_-_Run.mp3"),
    (202, "Channa Mereya", "Arijit Singh", "Ae Dil Hai Mushkil", "Hindi", "Komiku_-_04_-_Level_5.mp3"),
    (203, "Tera Ban Jaunga", "Akhil Sachdeva", "Kabir Singh", "Hindi", "Komiku_-_14_-_Level_15.mp3"),
    (204, "Hindi Pop", "Komiku", "Best Off", "Hindi", "Komiku_-_20_-_Level_21.mp3"),
    (301, "Karabuu", "Chandan Shetty", "Pogaru", "Kannada", "Komiku_-_05_-_Level_6.mp3"),
    (302, "Belageddu", "Vijay Prakash", "Kirik Party", "Kannada", "Komiku_-_06_-_Level_7.mp3"),
    (303, "Ondu Malebillu", "Sonu Nigam", "Kirik Party", "Kannada", "Komiku_-_15_-_Level_16.mp3"),
    (304, "Kannada Melody", "Komiku", "Best Off", "Kannada", "Komiku_-_21_-_Level_22.mp3"),
    (401, "Shape of You", "Ed Sheeran", "Divide", "English", "Komiku_-_07_-_Level_8.mp3"),
    (402, "Blinding Lights", "The Weeknd", "After Hours", "English", "Komiku_-_08_-_Level_9.mp3"),
    (403, "Memories", "Maroon 5", "Memories", "English", "Komiku_-_16_-_Level_17.mp3"),
    (404, "English Indie", "Komiku", "Best Off", "English", "Komiku_-_22_-_Level_23.mp3"),
    (501, "Rowdy Baby", "Dhanush, Dhee", "Maari 2", "Tamil", "Komiku_-_09_-_Level_10.mp3"),
    (502, "Vaathi Coming", "Anirudh Ravichander", "Master", "Tamil", "Komiku_-_10_-_Level_11.mp3"),
    (503, "Why This Kolaveri Di", "Dhanush", "3", "Tamil", "Komiku_-_17_-_Level_18.mp3"),
    (504, "Tamil Classic", "Komiku", "Best Off", "Tamil", "Komiku_-_23_-_Level_24.mp3"),
    (601, "Jimikki Kammal", "Vineeth Sreenivasan", "Velipadinte Pusthakam", "Malayalam", "Komiku_-_11_-_Level_12.mp3"),
    (602, "Entammede Jimikki Kammal", "Vineeth Sreenivasan", "Velipadinte Pusthakam", "Malayalam", "Komiku_-_12_-_Level_13.mp3"),
    (603, "Malare", "Vijay Yesudas", "Premam", "Malayalam", "Komiku_-_18_-_Level_19.mp3"),
    (604, "Malayalam Beat", "Komiku", "Best Off", "Malayalam", "Komiku_-_24_-_Level_25.mp3"),
];

/// Read-only list of tracks
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Catalog over an explicit track list
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// The built-in multi-language demo catalog
    pub fn demo() -> Self {
        let tracks = DEMO_TRACKS
            .iter()
            .map(|&(id, title, artist, album, language, file)| {
                Track::new(TrackId::from(id), title, artist)
                    .with_album(album)
                    .with_language(language)
                    .with_cover(DEFAULT_COVER)
                    .with_source(AudioSource::from_url(format!("{PREVIEW_BASE}/{file}")))
            })
            .collect();
        Self { tracks }
    }

    /// Demo catalog followed by the tracks found in `dir`.
    ///
    /// Scan failures are logged and leave only the demo tracks.
    pub fn with_local(dir: impl AsRef<Path>) -> Self {
        let mut catalog = Self::demo();
        catalog.extend_from(&LocalDiscovery::new(dir.as_ref()));
        catalog
    }

    /// Append tracks found by `discovery`
    pub fn extend_from(&mut self, discovery: &LocalDiscovery) {
        match discovery.discover() {
            Ok(tracks) => self.tracks.extend(tracks),
            Err(e) => {
                tracing::warn!("Failed to scan {}: {}", discovery.dir().display(), e);
            }
        }
    }

    /// Every track, optionally restricted to one language
    pub fn list(&self, language: Option<&str>) -> Vec<Track> {
        self.tracks
            .iter()
            .filter(|t| t.matches_language(language))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search on title, artist and album,
    /// optionally restricted to one language. An empty query lists
    /// everything.
    pub fn search(&self, query: &str, language: Option<&str>) -> Vec<Track> {
        self.tracks
            .iter()
            .filter(|t| t.matches_language(language) && t.matches_query(query))
            .cloned()
            .collect()
    }

    /// Look up a track by id
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    /// All tracks in catalog order
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

    /// Distinct languages in catalog order
    pub fn languages(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for track in &self.tracks {
            if !seen.iter().any(|l| l.eq_ignore_ascii_case(&track.language)) {
                seen.push(track.language.clone());
            }
        }
        seen
    }
}

//! Track domain type
use crate::types::{AudioFormat, AudioSource, TrackId};
use serde::{Deserialize, Serialize};

/// Playable track as listed by the catalog and stored in playlists
///
/// `sources` is ordered by preference. A track may have no sources at all,
/// in which case playback fails with a load error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TrackRecord", into = "TrackRecord")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Language the catalog files this track under
    pub language: String,

    /// Cover art URL
    pub cover: String,

    /// Candidate audio files, most preferred first
    pub sources: Vec<AudioSource>,
}

impl Track {
    /// Create a track with no album, language, cover or sources
    pub fn new(id: TrackId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            album: String::new(),
            language: String::new(),
            cover: String::new(),
            sources: Vec::new(),
        }
    }

    /// Set the album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the cover art URL
    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = cover.into();
        self
    }

    /// Append a source (lowest preference so far)
    #[must_use]
    pub fn with_source(mut self, source: AudioSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Most preferred source, if any
    pub fn preferred_source(&self) -> Option<&AudioSource> {
        self.sources.first()
    }

    /// First source of the given format
    pub fn source_for(&self, format: AudioFormat) -> Option<&AudioSource> {
        self.sources.iter().find(|s| s.format == format)
    }

    /// Case-insensitive substring match on title, artist or album.
    ///
    /// An empty (or all-whitespace) query matches every track.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.title, &self.artist, &self.album]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Exact case-insensitive language match. `None` or an empty filter
    /// matches every track.
    pub fn matches_language(&self, language: Option<&str>) -> bool {
        match language.map(str::trim) {
            None | Some("") => true,
            Some(lang) => self.language.to_lowercase() == lang.to_lowercase(),
        }
    }
}

/// Wire form of a track.
///
/// Older clients only know the single `previewUrl` field (plus the per-format
/// `previewMp3`/`previewM4a`), so those are written alongside `sources` and
/// used to rebuild `sources` when a stored record predates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackRecord {
    id: TrackId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    album: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    cover: String,
    #[serde(default)]
    sources: Vec<AudioSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preview_mp3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preview_m4a: Option<String>,
}

impl From<TrackRecord> for Track {
    fn from(record: TrackRecord) -> Self {
        let mut sources = record.sources;
        if sources.is_empty() {
            let legacy = [record.preview_mp3, record.preview_m4a, record.preview_url];
            for url in legacy.into_iter().flatten().filter(|u| !u.is_empty()) {
                if !sources.iter().any(|s| s.url == url) {
                    sources.push(AudioSource::from_url(url));
                }
            }
        }

        Self {
            id: record.id,
            title: record.title,
            artist: record.artist,
            album: record.album,
            language: record.language,
            cover: record.cover,
            sources,
        }
    }
}

impl From<Track> for TrackRecord {
    fn from(track: Track) -> Self {
        let preview_url = track.preferred_source().map(|s| s.url.clone());
        let preview_mp3 = track.source_for(AudioFormat::Mp3).map(|s| s.url.clone());
        let preview_m4a = track.source_for(AudioFormat::M4a).map(|s| s.url.clone());

        Self {
            id: track.id,
            title: track.title,
            artist: track.artist,
            album: track.album,
            language: track.language,
            cover: track.cover,
            sources: track.sources,
            preview_url,
            preview_mp3,
            preview_m4a,
        }
    }
}

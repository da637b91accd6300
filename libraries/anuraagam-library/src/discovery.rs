//! Local audio discovery
//!
//! Turns a flat directory of uploaded audio files into catalog tracks. Files
//! that share a stem (`song.mp3` + `song.m4a`) become one track with both
//! formats as sources, mp3 first.

use anuraagam_core::{AudioFormat, AudioSource, Track, TrackId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{LibraryError, Result};

/// Audio extensions picked up from the local directory
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "m4a"];

/// First id handed to discovered tracks, clear of the demo catalog's ids
pub const LOCAL_ID_BASE: u64 = 1000;

/// Cover shown for tracks without their own art
pub const DEFAULT_COVER: &str = "https://i.scdn.co/image/ab67616d0000b273b7e2e2e2e2e2e2e2e2e2e2e2";

/// Scanner for a local audio directory
#[derive(Debug, Clone)]
pub struct LocalDiscovery {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalDiscovery {
    /// Scan `dir`, serving files under `/download`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: "/download".to_string(),
        }
    }

    /// Set the URL prefix files are served under
    #[must_use]
    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    /// Scanned directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Discover tracks, ordered by file stem.
    ///
    /// A missing directory yields no tracks; a path that exists but is not a
    /// directory is an error.
    pub fn discover(&self) -> Result<Vec<Track>> {
        if !self.dir.exists() {
            tracing::debug!(dir = %self.dir.display(), "Local audio directory missing");
            return Ok(Vec::new());
        }
        if !self.dir.is_dir() {
            return Err(LibraryError::Discovery(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }

        // stem -> (mp3 file name, m4a file name)
        let mut by_stem: BTreeMap<String, (Option<String>, Option<String>)> = BTreeMap::new();

        let walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Failed to read entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(format) = audio_format(path) else {
                continue;
            };
            let (Some(stem), Some(name)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.file_name().and_then(|s| s.to_str()),
            ) else {
                tracing::warn!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };

            let slot = by_stem.entry(stem.to_string()).or_default();
            match format {
                AudioFormat::Mp3 => slot.0 = Some(name.to_string()),
                _ => slot.1 = Some(name.to_string()),
            }
        }

        let tracks: Vec<Track> = by_stem
            .into_iter()
            .zip(LOCAL_ID_BASE..)
            .map(|((stem, (mp3, m4a)), id)| {
                let mut track = Track::new(TrackId::from(id), display_title(&stem), "Local")
                    .with_album("User Uploads")
                    .with_language("Unknown")
                    .with_cover(DEFAULT_COVER);
                for (file, format) in [(mp3, AudioFormat::Mp3), (m4a, AudioFormat::M4a)] {
                    if let Some(file) = file {
                        track = track.with_source(AudioSource::new(self.url_for(&file), format));
                    }
                }
                track
            })
            .collect();

        tracing::info!(dir = %self.dir.display(), count = tracks.len(), "Discovered local tracks");
        Ok(tracks)
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_prefix, urlencoding::encode(file_name))
    }
}

/// Check if a file is a supported audio file
pub fn is_audio_file(path: &Path) -> bool {
    audio_format(path).is_some()
}

fn audio_format(path: &Path) -> Option<AudioFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .filter(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .map(|ext| AudioFormat::from_extension(&ext))
}

/// Title shown for a file stem: underscores become spaces and a trailing
/// `(0)` duplicate marker is dropped
pub fn display_title(stem: &str) -> String {
    let title = stem.replace('_', " ");
    match title.strip_suffix("(0)") {
        Some(stripped) => stripped.to_string(),
        None => title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("test.mp3")));
        assert!(is_audio_file(Path::new("test.M4A")));
        assert!(!is_audio_file(Path::new("test.flac")));
        assert!(!is_audio_file(Path::new("test.txt")));
        assert!(!is_audio_file(Path::new("test")));
    }

    #[test]
    fn title_cleanup() {
        assert_eq!(display_title("Naatu_Naatu"), "Naatu Naatu");
        assert_eq!(display_title("Kesariya(0)"), "Kesariya");
        assert_eq!(display_title("(0)Intro"), "(0)Intro");
    }

    #[test]
    fn groups_formats_by_stem() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b_song.m4a"), b"m4a").unwrap();
        fs::write(temp.path().join("a song.mp3"), b"mp3").unwrap();
        fs::write(temp.path().join("b_song.mp3"), b"mp3").unwrap();
        fs::write(temp.path().join("notes.txt"), b"txt").unwrap();

        let tracks = LocalDiscovery::new(temp.path()).discover().unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, TrackId::from(1000));
        assert_eq!(tracks[0].title, "a song");
        assert_eq!(tracks[0].sources[0].url, "/download/a%20song.mp3");

        assert_eq!(tracks[1].id, TrackId::from(1001));
        assert_eq!(tracks[1].title, "b song");
        assert_eq!(tracks[1].artist, "Local");
        assert_eq!(tracks[1].album, "User Uploads");
        assert_eq!(tracks[1].language, "Unknown");
        let formats: Vec<_> = tracks[1].sources.iter().map(|s| s.format).collect();
        assert_eq!(formats, vec![AudioFormat::Mp3, AudioFormat::M4a]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let tracks = LocalDiscovery::new(temp.path().join("nope")).discover().unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn file_instead_of_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("song.mp3");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            LocalDiscovery::new(file).discover(),
            Err(LibraryError::Discovery(_))
        ));
    }
}

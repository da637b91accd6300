//! Playable audio references
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container/codec of a playable audio file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MPEG-1 Layer III
    Mp3,
    /// AAC in an MP4 container
    M4a,
    /// Ogg Vorbis/Opus
    Ogg,
    /// PCM WAVE
    Wav,
    /// Free Lossless Audio Codec
    Flac,
    /// Anything else; played as an opaque stream
    Unknown,
}

impl AudioFormat {
    /// Guess the format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Self::Mp3,
            "m4a" | "mp4" | "aac" => Self::M4a,
            "ogg" | "oga" => Self::Ogg,
            "wav" => Self::Wav,
            "flac" => Self::Flac,
            _ => Self::Unknown,
        }
    }

    /// Guess the format from a path or URL
    pub fn from_path(path: &str) -> Self {
        let without_query = path.split(['?', '#']).next().unwrap_or(path);
        Path::new(without_query)
            .extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }

    /// Canonical file extension (empty for `Unknown`)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Unknown => "",
        }
    }

    /// MIME type served for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::M4a => "audio/mp4",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// One candidate audio file for a track
///
/// A track lists its sources in order of preference; the media element
/// plays the first one it can decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioSource {
    /// URL or path the media element fetches
    pub url: String,

    /// Format of the file behind `url`
    pub format: AudioFormat,
}

impl AudioSource {
    /// Create a source with an explicit format
    pub fn new(url: impl Into<String>, format: AudioFormat) -> Self {
        Self {
            url: url.into(),
            format,
        }
    }

    /// Create a source, guessing the format from the URL
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let format = AudioFormat::from_path(&url);
        Self { url, format }
    }

    /// MIME type of the underlying file
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_url_ignores_query() {
        assert_eq!(
            AudioFormat::from_path("/download/song.M4A?v=2"),
            AudioFormat::M4a
        );
        assert_eq!(AudioFormat::from_path("https://x/y.mp3"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_path("/download/noext"), AudioFormat::Unknown);
    }

    #[test]
    fn m4a_is_served_as_mp4() {
        assert_eq!(AudioFormat::M4a.mime_type(), "audio/mp4");
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
    }
}

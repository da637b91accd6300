//! Anuraagam Core
//!
//! Platform-agnostic domain types and error handling shared by the playback
//! controller, the library store and the HTTP server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `AudioSource`, `User`
//! - **Identifiers**: `TrackId` and `UserId`, one canonical string form each
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use anuraagam_core::{AudioFormat, AudioSource, Track, TrackId};
//!
//! let track = Track::new(TrackId::from(101), "Butta Bomma", "Armaan Malik")
//!     .with_album("Ala Vaikunthapurramuloo")
//!     .with_language("Telugu")
//!     .with_source(AudioSource::new("/download/butta-bomma.mp3", AudioFormat::Mp3));
//!
//! assert_eq!(track.id.as_str(), "101");
//! assert!(track.matches_language(Some("telugu")));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use types::{AudioFormat, AudioSource, Track, TrackId, User, UserId};

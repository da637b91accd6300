//! Anuraagam Library
//!
//! Everything the player keeps about music outside of playback itself:
//!
//! - **Catalog**: the demo track list plus audio files found in a local
//!   upload directory, with language filtering and text search
//! - **Store**: playlist and favorites, deduplicated by track id
//! - **Session**: the logged-in user's display name
//! - **Persistence**: a small key-value abstraction with in-memory and
//!   file-backed implementations
//!
//! # Example
//!
//! ```rust
//! use anuraagam_library::{Catalog, LibraryStore, MemoryKeyValueStore};
//!
//! let catalog = Catalog::demo();
//! let mut store = LibraryStore::load(MemoryKeyValueStore::new());
//!
//! for track in catalog.search("sid sriram", Some("telugu")) {
//!     store.add_to_playlist(track)?;
//! }
//! assert_eq!(store.playlist().len(), 2);
//! # Ok::<(), anuraagam_library::LibraryError>(())
//! ```

mod catalog;
mod discovery;
mod error;
pub mod kv;
mod session;
mod store;

pub use catalog::Catalog;
pub use discovery::{display_title, is_audio_file, LocalDiscovery, LOCAL_ID_BASE};
pub use error::{LibraryError, Result};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use session::SessionStore;
pub use store::{LibraryStore, TrackSet};

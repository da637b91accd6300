//! Library-specific errors
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library error types
#[derive(Error, Debug)]
pub enum LibraryError {
    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local audio directory could not be scanned
    #[error("Discovery error: {0}")]
    Discovery(String),
}

impl From<LibraryError> for anuraagam_core::CoreError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Io(e) => Self::Io(e),
            LibraryError::Serialization(e) => Self::Serialization(e),
            LibraryError::Discovery(msg) => Self::InvalidInput(msg),
        }
    }
}

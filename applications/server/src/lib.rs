//! Anuraagam Server Library
//!
//! HTTP backend for the Anuraagam player: the song catalog, accounts,
//! one-time codes over email and SMS, and audio downloads.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use repository::Repositories;
pub use router::create_router;
pub use services::{auth::AuthService, downloads::DownloadStore, otp::OtpService};
pub use state::AppState;

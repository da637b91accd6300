//! Shared application state
use crate::config::ServerConfig;
use crate::repository::{Repositories, UserRepository};
use crate::services::{AuthService, DownloadStore, Mailer, OtpService};
use anuraagam_library::Catalog;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub users: Arc<dyn UserRepository>,
    pub otp: Arc<OtpService>,
    pub auth_service: Arc<AuthService>,
    pub downloads: Arc<DownloadStore>,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        users: Arc<dyn UserRepository>,
        otp: Arc<OtpService>,
        auth_service: Arc<AuthService>,
        downloads: Arc<DownloadStore>,
    ) -> Self {
        Self {
            catalog,
            users,
            otp,
            auth_service,
            downloads,
        }
    }
}

impl AppState {
    /// Wire every service from configuration
    ///
    /// The catalog is built once here; files added to the songs directory
    /// later are still downloadable but only listed after a restart.
    pub fn from_config(
        config: &ServerConfig,
        repositories: Repositories,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let catalog = if config.catalog.include_local {
            Catalog::with_local(&config.storage.songs_dir)
        } else {
            Catalog::demo()
        };
        tracing::info!("Catalog loaded with {} tracks", catalog.len());

        let otp = OtpService::new(repositories.otps, mailer, &config.otp);
        if otp.is_demo() {
            tracing::warn!("No mail credentials configured; OTP runs in demo mode");
        }

        let auth_service = AuthService::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_expiration_hours,
        );

        Self::new(
            Arc::new(catalog),
            repositories.users,
            Arc::new(otp),
            Arc::new(auth_service),
            Arc::new(DownloadStore::new(config.storage.songs_dir.clone())),
        )
    }
}

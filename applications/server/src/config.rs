//! Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder credential fragment shipped in sample env files
const PLACEHOLDER_CREDENTIAL: &str = "your_ethereal_";

/// Longest accepted OTP lifetime (one year)
pub const MAX_OTP_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_otp")]
    pub otp: OtpSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Built front-end served as the SPA fallback
    #[serde(default)]
    pub web_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Accounts and codes live only as long as the process
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Directory served under `/download` and scanned for local tracks
    #[serde(default = "default_songs_dir")]
    pub songs_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpSettings {
    #[serde(default = "default_otp_ttl_seconds")]
    pub ttl_seconds: u64,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// STARTTLS submission port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_user: String,

    #[serde(default)]
    pub smtp_pass: String,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,
}

impl OtpSettings {
    /// Demo mode: no usable mail credentials, so the fixed code is issued
    pub fn is_demo(&self) -> bool {
        let placeholder = |value: &str| {
            value.trim().is_empty() || value.to_lowercase().contains(PLACEHOLDER_CREDENTIAL)
        };
        placeholder(&self.smtp_user) || placeholder(&self.smtp_pass)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// Append tracks discovered in `storage.songs_dir` to the demo catalog
    #[serde(default = "default_include_local")]
    pub include_local: bool,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `config.toml` in the working directory; a missing
    /// file is not an error. Environment variables prefixed `ANURAAGAM_`
    /// override file values, with `__` between sections
    /// (`ANURAAGAM_AUTH__JWT_SECRET`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ANURAAGAM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set ANURAAGAM_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.otp.ttl_seconds == 0 || self.otp.ttl_seconds > MAX_OTP_TTL_SECONDS {
            return Err(ServerError::Config(format!(
                "OTP ttl_seconds must be between 1 and {MAX_OTP_TTL_SECONDS}"
            )));
        }

        if let Some(web_dir) = &self.server.web_dir {
            if !web_dir.is_dir() {
                return Err(ServerError::Config(format!(
                    "Web directory not found at {}",
                    web_dir.display()
                )));
            }
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        web_dir: None,
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        backend: default_backend(),
        database_url: default_database_url(),
        songs_dir: default_songs_dir(),
    }
}

fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}

fn default_database_url() -> String {
    "sqlite://./data/anuraagam.db".to_string()
}

fn default_songs_dir() -> PathBuf {
    PathBuf::from("./songs")
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

fn default_otp() -> OtpSettings {
    OtpSettings {
        ttl_seconds: default_otp_ttl_seconds(),
        smtp_host: default_smtp_host(),
        smtp_port: default_smtp_port(),
        smtp_user: String::new(),
        smtp_pass: String::new(),
        mail_from: default_mail_from(),
    }
}

fn default_otp_ttl_seconds() -> u64 {
    600
}

fn default_smtp_host() -> String {
    "smtp.ethereal.email".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_mail_from() -> String {
    "no-reply@anuraagam.com".to_string()
}

fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        include_local: default_include_local(),
    }
}

fn default_include_local() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            otp: default_otp(),
            catalog: default_catalog(),
        }
    }
}

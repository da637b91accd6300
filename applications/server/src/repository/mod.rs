//! Account and one-time-code persistence
//!
//! Handlers only see the `UserRepository` and `OtpRepository` traits. The
//! in-memory implementations back tests and throwaway demos, the SQLite ones
//! back a real deployment.

mod otps;
mod users;

pub use otps::{MemoryOtpRepository, OtpRecord, OtpRepository, SqliteOtpRepository};
pub use users::{MemoryUserRepository, SqliteUserRepository, UserRecord, UserRepository};

use crate::config::{StorageBackend, StorageSettings};
use crate::error::Result;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// An in-memory URL gets a single connection, since every connection to
/// `sqlite::memory:` opens a separate database.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let in_memory = database_url.contains(":memory:");
    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(std::time::Duration::from_secs(30));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// The repositories a server instance runs against
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub otps: Arc<dyn OtpRepository>,
}

impl Repositories {
    /// Process-local repositories
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            otps: Arc::new(MemoryOtpRepository::new()),
        }
    }

    /// Repositories sharing one `SQLite` pool
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            otps: Arc::new(SqliteOtpRepository::new(pool)),
        }
    }

    /// Open whatever backend the storage settings name, migrating the
    /// database first when it is `SQLite`
    pub async fn open(settings: &StorageSettings) -> Result<Self> {
        match settings.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; accounts are lost on restart");
                Ok(Self::memory())
            }
            StorageBackend::Sqlite => {
                if let Some(parent) = sqlite_file_parent(&settings.database_url) {
                    tokio::fs::create_dir_all(&parent).await?;
                }
                let pool = create_pool(&settings.database_url).await?;
                run_migrations(&pool).await?;
                tracing::info!("Database ready at {}", settings.database_url);
                Ok(Self::sqlite(pool))
            }
        }
    }
}

/// Directory that must exist before `SQLite` can create the database file
fn sqlite_file_parent(database_url: &str) -> Option<std::path::PathBuf> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    std::path::Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(std::path::Path::to_path_buf)
}

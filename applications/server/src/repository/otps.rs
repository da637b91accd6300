//! Pending one-time codes, one per channel
use crate::error::{Result, ServerError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Code issued to a channel (an email address or a mobile number)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub channel: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn new(channel: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            code: code.into(),
            issued_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Store a code, replacing any earlier one for the same channel
    async fn put(&self, record: OtpRecord) -> Result<()>;

    async fn get(&self, channel: &str) -> Result<Option<OtpRecord>>;

    /// Returns whether a code was present
    async fn remove(&self, channel: &str) -> Result<bool>;
}

#[derive(Debug, Default)]
pub struct MemoryOtpRepository {
    codes: RwLock<HashMap<String, OtpRecord>>,
}

impl MemoryOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpRepository for MemoryOtpRepository {
    async fn put(&self, record: OtpRecord) -> Result<()> {
        self.codes
            .write()
            .await
            .insert(record.channel.clone(), record);
        Ok(())
    }

    async fn get(&self, channel: &str) -> Result<Option<OtpRecord>> {
        Ok(self.codes.read().await.get(channel).cloned())
    }

    async fn remove(&self, channel: &str) -> Result<bool> {
        Ok(self.codes.write().await.remove(channel).is_some())
    }
}

/// Codes stored in the `otp_codes` table
#[derive(Debug, Clone)]
pub struct SqliteOtpRepository {
    pool: SqlitePool,
}

impl SqliteOtpRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpRepository for SqliteOtpRepository {
    async fn put(&self, record: OtpRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO otp_codes (channel, code, issued_at)
             VALUES (?, ?, ?)
             ON CONFLICT(channel)
             DO UPDATE SET code = excluded.code, issued_at = excluded.issued_at",
        )
        .bind(&record.channel)
        .bind(&record.code)
        .bind(record.issued_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, channel: &str) -> Result<Option<OtpRecord>> {
        let row = sqlx::query("SELECT channel, code, issued_at FROM otp_codes WHERE channel = ?")
            .bind(channel)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let issued_at: i64 = row.get("issued_at");
        let issued_at = DateTime::<Utc>::from_timestamp_millis(issued_at)
            .ok_or_else(|| ServerError::Internal(format!("Invalid issued_at: {issued_at}")))?;

        Ok(Some(OtpRecord {
            channel: row.get("channel"),
            code: row.get("code"),
            issued_at,
        }))
    }

    async fn remove(&self, channel: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM otp_codes WHERE channel = ?")
            .bind(channel)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_replaces_previous_code() {
        let repo = MemoryOtpRepository::new();
        repo.put(OtpRecord::new("a@example.com", "111111"))
            .await
            .unwrap();
        repo.put(OtpRecord::new("a@example.com", "222222"))
            .await
            .unwrap();

        let record = repo.get("a@example.com").await.unwrap().unwrap();
        assert_eq!(record.code, "222222");

        assert!(repo.remove("a@example.com").await.unwrap());
        assert!(!repo.remove("a@example.com").await.unwrap());
        assert!(repo.get("a@example.com").await.unwrap().is_none());
    }
}

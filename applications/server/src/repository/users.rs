//! User accounts
use crate::error::{Result, ServerError};
use anuraagam_core::{User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// A user together with the bcrypt hash of their password
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create an account. Fails with `Conflict` when the username is taken.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    /// All users ordered by username
    async fn list(&self) -> Result<Vec<User>>;

    async fn count(&self) -> Result<usize>;
}

fn username_taken() -> ServerError {
    ServerError::Conflict("Username already exists.".to_string())
}

/// Users kept in process memory, keyed by username
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<BTreeMap<String, UserRecord>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(username_taken());
        }

        let user = User::new(username);
        users.insert(
            username.to_string(),
            UserRecord {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .map(|record| record.user.clone())
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.users.read().await.len())
    }
}

/// Users stored in the `users` table
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserRecord> {
    let created_at: i64 = row.get("created_at");
    let created_at = DateTime::<Utc>::from_timestamp(created_at, 0)
        .ok_or_else(|| ServerError::Internal(format!("Invalid created_at: {created_at}")))?;

    Ok(UserRecord {
        user: User {
            id: UserId::new(row.get::<String, _>("id")),
            username: row.get("username"),
            created_at,
        },
        password_hash: row.get("password_hash"),
    })
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User> {
        let user = User::new(username);

        let inserted = sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.as_str())
        .bind(&user.username)
        .bind(password_hash)
        .bind(user.created_at.timestamp())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(username_taken()),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| user_from_row(row).map(|record| record.user))
            .collect()
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let repo = MemoryUserRepository::new();
        repo.create("meera", "hash").await.unwrap();

        let err = repo.create("meera", "other").await.unwrap_err();
        assert!(matches!(err, ServerError::Conflict(_)));
        assert_eq!(repo.count().await.unwrap(), 1);

        let stored = repo.find_by_username("meera").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "hash");
    }

    #[tokio::test]
    async fn list_is_sorted_by_username() {
        let repo = MemoryUserRepository::new();
        repo.create("zoya", "h").await.unwrap();
        repo.create("arjun", "h").await.unwrap();

        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["arjun", "zoya"]);
    }
}

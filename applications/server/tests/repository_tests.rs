//! SQLite repository tests
//! Run against a temporary database file with migrations applied
use anuraagam_server::{
    config::{StorageBackend, StorageSettings},
    repository::{create_pool, run_migrations, OtpRecord, Repositories},
    ServerError,
};
use chrono::{Duration, Utc};
use tempfile::TempDir;

async fn create_test_repositories() -> (Repositories, TempDir) {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("test.db").display());

    let pool = create_pool(&url).await.unwrap();
    run_migrations(&pool).await.unwrap();

    (Repositories::sqlite(pool), dir)
}

#[tokio::test]
async fn test_create_and_find_user() {
    let (repos, _dir) = create_test_repositories().await;

    let user = repos.users.create("meera", "$2b$04$hash").await.unwrap();
    let record = repos.users.find_by_username("meera").await.unwrap().unwrap();

    assert_eq!(record.user.id, user.id);
    assert_eq!(record.user.username, "meera");
    assert_eq!(record.password_hash, "$2b$04$hash");
    assert_eq!(
        record.user.created_at.timestamp(),
        user.created_at.timestamp()
    );

    assert!(repos.users.find_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let (repos, _dir) = create_test_repositories().await;

    repos.users.create("meera", "h1").await.unwrap();
    let err = repos.users.create("meera", "h2").await.unwrap_err();

    assert!(matches!(err, ServerError::Conflict(_)));
    assert_eq!(repos.users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_users_sorted() {
    let (repos, _dir) = create_test_repositories().await;

    repos.users.create("zoya", "h").await.unwrap();
    repos.users.create("arjun", "h").await.unwrap();

    let names: Vec<_> = repos
        .users
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, vec!["arjun", "zoya"]);
}

#[tokio::test]
async fn test_otp_upsert_and_remove() {
    let (repos, _dir) = create_test_repositories().await;

    repos
        .otps
        .put(OtpRecord::new("a@example.com", "111111"))
        .await
        .unwrap();
    let mut replacement = OtpRecord::new("a@example.com", "222222");
    replacement.issued_at = Utc::now() - Duration::minutes(5);
    repos.otps.put(replacement.clone()).await.unwrap();

    let stored = repos.otps.get("a@example.com").await.unwrap().unwrap();
    assert_eq!(stored.code, "222222");
    assert_eq!(
        stored.issued_at.timestamp_millis(),
        replacement.issued_at.timestamp_millis()
    );

    assert!(repos.otps.remove("a@example.com").await.unwrap());
    assert!(!repos.otps.remove("a@example.com").await.unwrap());
}

/// Data survives reopening the same file
#[tokio::test]
async fn test_open_persists_across_pools() {
    let dir = TempDir::new().unwrap();
    let settings = StorageSettings {
        backend: StorageBackend::Sqlite,
        database_url: format!("sqlite://{}", dir.path().join("nested/app.db").display()),
        songs_dir: dir.path().to_path_buf(),
    };

    let repos = Repositories::open(&settings).await.unwrap();
    repos.users.create("meera", "h").await.unwrap();
    drop(repos);

    let reopened = Repositories::open(&settings).await.unwrap();
    assert_eq!(reopened.users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_in_memory_sqlite() {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    let repos = Repositories::sqlite(pool);

    repos.users.create("meera", "h").await.unwrap();
    assert_eq!(repos.users.count().await.unwrap(), 1);
}

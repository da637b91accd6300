//! Common test utilities and fixtures
#![allow(dead_code)]

use anuraagam_library::Catalog;
use anuraagam_server::{
    config::OtpSettings,
    create_router,
    repository::{MemoryOtpRepository, MemoryUserRepository, OtpRepository, UserRepository},
    services::{AuthService, DownloadStore, LogMailer, Mailer, OtpService, OutgoingMail},
    AppState, Result, ServerError,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Bytes of the download fixture
pub const SONG_BYTES: &[u8] = b"0123456789abcdef";

/// Test user credentials
pub mod fixtures {
    pub const TEST_USERNAME: &str = "testuser";
    pub const TEST_PASSWORD: &str = "TestPassword123!";
    pub const TEST_EMAIL: &str = "listener@example.com";
    pub const TEST_MOBILE: &str = "9876543210";
}

/// Mailer that always fails delivery
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: OutgoingMail) -> Result<()> {
        Err(ServerError::Delivery("connection refused".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserRepository>,
    pub otps: Arc<MemoryOtpRepository>,
    pub auth_service: Arc<AuthService>,
    pub songs_dir: TempDir,
}

fn otp_settings(demo: bool) -> OtpSettings {
    OtpSettings {
        ttl_seconds: 600,
        smtp_host: "smtp.ethereal.email".to_string(),
        smtp_port: 587,
        smtp_user: if demo { String::new() } else { "mailer".to_string() },
        smtp_pass: if demo { String::new() } else { "secret".to_string() },
        mail_from: "no-reply@anuraagam.com".to_string(),
    }
}

/// Demo-mode app over memory repositories and a temp songs directory
pub fn create_test_app() -> TestApp {
    create_test_app_with(Arc::new(LogMailer), true)
}

pub fn create_test_app_with(mailer: Arc<dyn Mailer>, demo: bool) -> TestApp {
    let songs_dir = TempDir::new().unwrap();
    std::fs::write(songs_dir.path().join("Naatu_Naatu.mp3"), SONG_BYTES).unwrap();
    std::fs::write(songs_dir.path().join("Srivalli(0).m4a"), SONG_BYTES).unwrap();

    let users = Arc::new(MemoryUserRepository::new());
    let otps = Arc::new(MemoryOtpRepository::new());
    let auth_service =
        Arc::new(AuthService::new("test-secret-key".to_string(), 1).with_bcrypt_cost(4));

    let otp_repo: Arc<dyn OtpRepository> = otps.clone();
    let user_repo: Arc<dyn UserRepository> = users.clone();
    let otp = OtpService::new(otp_repo, mailer, &otp_settings(demo));

    let app_state = AppState::new(
        Arc::new(Catalog::with_local(songs_dir.path())),
        user_repo,
        Arc::new(otp),
        Arc::clone(&auth_service),
        Arc::new(DownloadStore::new(songs_dir.path())),
    );

    TestApp {
        router: create_router(app_state, None),
        users,
        otps,
        auth_service,
        songs_dir,
    }
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

//! Account API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Body of both signup and login. Missing fields read as empty so that
/// they are reported as a 400 rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsRequest {
    fn require_both(&self) -> Result<(&str, &str)> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(ServerError::BadRequest(
                "Username and password required.".to_string(),
            ));
        }
        Ok((username, &self.password))
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
}

/// POST /auth/signup
pub async fn signup(
    State(app_state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SuccessResponse>> {
    let (username, password) = req.require_both()?;

    if app_state.users.find_by_username(username).await?.is_some() {
        return Err(ServerError::Conflict("Username already exists.".to_string()));
    }

    let hash = app_state.auth_service.hash_password(password)?;
    let user = app_state.users.create(username, &hash).await?;
    tracing::info!(username = %user.username, "Account created");

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>> {
    let (username, password) = req.require_both()?;
    let invalid = || ServerError::Auth("Invalid credentials.".to_string());

    let record = app_state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(invalid)?;

    if !app_state
        .auth_service
        .verify_password(password, &record.password_hash)?
    {
        return Err(invalid());
    }

    let token = app_state.auth_service.create_access_token(&record.user)?;

    Ok(Json(LoginResponse {
        success: true,
        username: record.user.username,
        token,
    }))
}

/// GET /auth/me
pub async fn me(user: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
    })
}

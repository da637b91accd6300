//! One-time code API routes
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMobileRequest {
    #[serde(default)]
    pub mobile: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyMobileRequest {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub demo: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
}

/// POST /otp/send-otp-email
pub async fn send_email(
    State(app_state): State<AppState>,
    Json(req): Json<SendEmailRequest>,
) -> Result<Json<SendResponse>> {
    let issued = app_state.otp.send_email(&req.email).await?;
    Ok(Json(SendResponse {
        success: true,
        demo: issued.demo,
    }))
}

/// POST /otp/verify-otp-email
pub async fn verify_email(
    State(app_state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<VerifyResponse>> {
    app_state.otp.verify(&req.email, &req.otp).await?;
    Ok(Json(VerifyResponse { success: true }))
}

/// POST /otp/send-otp-mobile
pub async fn send_mobile(
    State(app_state): State<AppState>,
    Json(req): Json<SendMobileRequest>,
) -> Result<Json<SendResponse>> {
    let issued = app_state.otp.send_mobile(&req.mobile).await?;
    Ok(Json(SendResponse {
        success: true,
        demo: issued.demo,
    }))
}

/// POST /otp/verify-otp-mobile
pub async fn verify_mobile(
    State(app_state): State<AppState>,
    Json(req): Json<VerifyMobileRequest>,
) -> Result<Json<VerifyResponse>> {
    app_state.otp.verify(&req.mobile, &req.otp).await?;
    Ok(Json(VerifyResponse { success: true }))
}

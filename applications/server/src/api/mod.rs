//! API route modules
pub mod auth;
pub mod catalog;
pub mod download;
pub mod health;
pub mod otp;

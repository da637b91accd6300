//! Server services
pub mod auth;
pub mod downloads;
pub mod mailer;
pub mod otp;

pub use auth::AuthService;
pub use downloads::DownloadStore;
pub use mailer::{mailer_for, LogMailer, Mailer, OutgoingMail, SmtpMailer};
pub use otp::OtpService;

//! One-time code issuing and verification
use crate::config::{OtpSettings, MAX_OTP_TTL_SECONDS};
use crate::error::{Result, ServerError};
use crate::repository::{OtpRecord, OtpRepository};
use crate::services::mailer::{Mailer, OutgoingMail};
use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;

/// Code issued whenever no real mail transport is configured
pub const DEMO_CODE: &str = "123456";

pub const MAIL_SUBJECT: &str = "Your Anuraagam OTP";

/// Outcome of issuing a code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Issued {
    /// The fixed demo code was stored instead of a random one
    pub demo: bool,
}

pub struct OtpService {
    codes: Arc<dyn OtpRepository>,
    mailer: Arc<dyn Mailer>,
    ttl: Duration,
    demo: bool,
    mail_from: String,
}

impl OtpService {
    pub fn new(
        codes: Arc<dyn OtpRepository>,
        mailer: Arc<dyn Mailer>,
        settings: &OtpSettings,
    ) -> Self {
        Self {
            codes,
            mailer,
            ttl: ttl_from_seconds(settings.ttl_seconds),
            demo: settings.is_demo(),
            mail_from: settings.mail_from.clone(),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Issue a code for an email address and mail it
    ///
    /// In demo mode the fixed code is stored and nothing is sent. Otherwise
    /// the code is only stored once the mailer accepted the message, so a
    /// failed delivery leaves any earlier code in place.
    pub async fn send_email(&self, email: &str) -> Result<Issued> {
        let email = required(email, "Email required.")?;

        if self.demo {
            self.codes.put(OtpRecord::new(email, DEMO_CODE)).await?;
            tracing::info!(%email, "Demo mode: issued fixed email OTP");
            return Ok(Issued { demo: true });
        }

        let code = generate_code();
        let minutes = self.ttl.num_minutes().max(1);
        self.mailer
            .send(OutgoingMail {
                from: self.mail_from.clone(),
                to: email.to_string(),
                subject: MAIL_SUBJECT.to_string(),
                text: format!("Your OTP is {code}. It expires in {minutes} minutes."),
            })
            .await
            .map_err(|e| match e {
                ServerError::Delivery(_) => e,
                other => ServerError::Delivery(other.to_string()),
            })?;

        self.codes.put(OtpRecord::new(email, code)).await?;
        tracing::debug!(%email, "Email OTP sent");
        Ok(Issued { demo: false })
    }

    /// Issue a code for a mobile number
    ///
    /// There is no SMS gateway: the code is stored and logged.
    pub async fn send_mobile(&self, mobile: &str) -> Result<Issued> {
        let mobile = required(mobile, "Mobile required.")?;

        let code = if self.demo {
            DEMO_CODE.to_string()
        } else {
            generate_code()
        };
        tracing::info!(%mobile, %code, "Mobile OTP issued");
        self.codes.put(OtpRecord::new(mobile, code)).await?;

        Ok(Issued { demo: self.demo })
    }

    /// Check a submitted code
    ///
    /// A matching, unexpired code is consumed. A wrong code leaves the stored
    /// one untouched; an expired one is removed.
    pub async fn verify(&self, channel: &str, otp: &str) -> Result<()> {
        let channel = channel.trim();
        let Some(record) = self.codes.get(channel).await? else {
            return Err(invalid_otp());
        };

        if Utc::now() - record.issued_at > self.ttl {
            self.codes.remove(channel).await?;
            tracing::debug!(%channel, "OTP expired");
            return Err(invalid_otp());
        }

        if record.code != otp.trim() {
            return Err(invalid_otp());
        }

        self.codes.remove(channel).await?;
        Ok(())
    }
}

/// Code lifetime, clamped to `MAX_OTP_TTL_SECONDS`
fn ttl_from_seconds(seconds: u64) -> Duration {
    i64::try_from(seconds.min(MAX_OTP_TTL_SECONDS))
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or_else(Duration::zero)
}

fn invalid_otp() -> ServerError {
    ServerError::Auth("Invalid OTP".to_string())
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServerError::BadRequest(message.to_string()));
    }
    Ok(value)
}

/// Six digits, never with a leading zero
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryOtpRepository;
    use crate::services::mailer::LogMailer;

    fn settings(demo: bool) -> OtpSettings {
        OtpSettings {
            ttl_seconds: 600,
            smtp_host: "smtp.ethereal.email".into(),
            smtp_port: 587,
            smtp_user: if demo { String::new() } else { "user".into() },
            smtp_pass: if demo { String::new() } else { "pass".into() },
            mail_from: "no-reply@anuraagam.com".into(),
        }
    }

    fn service(demo: bool) -> (OtpService, Arc<MemoryOtpRepository>) {
        let repo = Arc::new(MemoryOtpRepository::new());
        let svc = OtpService::new(repo.clone(), Arc::new(LogMailer), &settings(demo));
        (svc, repo)
    }

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(!code.starts_with('0'));
        }
    }

    #[tokio::test]
    async fn demo_code_verifies_once() {
        let (svc, _) = service(true);
        assert!(svc.send_email("a@example.com").await.unwrap().demo);

        svc.verify("a@example.com", DEMO_CODE).await.unwrap();
        assert!(svc.verify("a@example.com", DEMO_CODE).await.is_err());
    }

    #[tokio::test]
    async fn wrong_code_keeps_stored_code() {
        let (svc, repo) = service(false);
        svc.send_mobile("9876543210").await.unwrap();
        let code = repo.get("9876543210").await.unwrap().unwrap().code;

        let wrong = if code == "100000" { "100001" } else { "100000" };
        assert!(svc.verify("9876543210", wrong).await.is_err());
        svc.verify("9876543210", &code).await.unwrap();
    }

    #[tokio::test]
    async fn expired_code_is_rejected_and_removed() {
        let (svc, repo) = service(true);
        let mut record = OtpRecord::new("a@example.com", DEMO_CODE);
        record.issued_at = Utc::now() - Duration::minutes(11);
        repo.put(record).await.unwrap();

        assert!(svc.verify("a@example.com", DEMO_CODE).await.is_err());
        assert!(repo.get("a@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn oversized_ttl_is_clamped() {
        assert_eq!(
            ttl_from_seconds(u64::MAX),
            Duration::seconds(MAX_OTP_TTL_SECONDS as i64)
        );
        assert_eq!(ttl_from_seconds(600), Duration::minutes(10));

        for ttl_seconds in [u64::MAX, 10_000_000_000_000_000] {
            let repo = Arc::new(MemoryOtpRepository::new());
            let settings = OtpSettings {
                ttl_seconds,
                ..settings(true)
            };
            let svc = OtpService::new(repo, Arc::new(LogMailer), &settings);

            svc.send_email("a@example.com").await.unwrap();
            svc.verify("a@example.com", DEMO_CODE).await.unwrap();
        }
    }

    #[tokio::test]
    async fn blank_channel_is_a_bad_request() {
        let (svc, _) = service(true);
        assert!(matches!(
            svc.send_email("  ").await,
            Err(ServerError::BadRequest(_))
        ));
        assert!(matches!(
            svc.send_mobile("").await,
            Err(ServerError::BadRequest(_))
        ));
    }
}

//! Outgoing mail
use crate::config::OtpSettings;
use crate::error::{Result, ServerError};
use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

/// A message ready to hand to a mail transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message; failures surface as `ServerError::Delivery`
    async fn send(&self, mail: OutgoingMail) -> Result<()>;
}

/// Pick the transport for the OTP settings
///
/// Demo settings get `LogMailer`; anything else relays through SMTP.
pub fn mailer_for(settings: &OtpSettings) -> Result<Arc<dyn Mailer>> {
    if settings.is_demo() {
        return Ok(Arc::new(LogMailer));
    }
    Ok(Arc::new(SmtpMailer::from_settings(settings)?))
}

/// Writes mail to the log instead of delivering it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<()> {
        tracing::info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            "{}",
            mail.text
        );
        Ok(())
    }
}

/// Delivers mail through an authenticated STARTTLS relay
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Build the relay transport; no connection is made until the first send
    pub fn from_settings(settings: &OtpSettings) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .map_err(|e| ServerError::Config(format!("Invalid SMTP host: {}", e)))?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.smtp_user.clone(),
                settings.smtp_pass.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            host: settings.smtp_host.clone(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

fn mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| ServerError::Delivery(format!("Invalid address {}: {}", address, e)))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<()> {
        let message = Message::builder()
            .from(mailbox(&mail.from)?)
            .to(mailbox(&mail.to)?)
            .subject(mail.subject)
            .body(mail.text)
            .map_err(|e| ServerError::Delivery(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| ServerError::Delivery(e.to_string()))?;

        tracing::debug!(to = %mail.to, host = %self.host, "Mail relayed");
        Ok(())
    }
}

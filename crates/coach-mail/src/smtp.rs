//! # SMTP Mailer
//!
//! `MailSender` backed by a pooled lettre SMTP transport.

use crate::config::MailConfig;
use async_trait::async_trait;
use coach_core::{MailError, MailResult, MailSender, OutgoingEmail};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, instrument};

/// Sends plain-text mail through an authenticated relay.
///
/// The transport is created once and reused; connections are opened lazily
/// on first send.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a mailer from configuration.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &MailConfig) -> MailResult<Self> {
        let from = parse_mailbox(&config.from_address)?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let builder = if config.uses_implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| MailError::Configuration(format!("SMTP relay {}: {}", config.smtp_host, e)))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self { transport, from })
    }

    /// Create from environment variables
    pub fn from_env() -> MailResult<Self> {
        let config = MailConfig::from_env()?;
        Self::new(&config)
    }

    fn build_message(&self, email: &OutgoingEmail) -> MailResult<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&email.to)?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: &OutgoingEmail) -> MailResult<()> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        info!("Email sent successfully");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> MailResult<Mailbox> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_core::{Currency, Price};

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(&MailConfig::new("coach@gmail.com", "app-password")).unwrap()
    }

    #[tokio::test]
    async fn test_build_purchase_confirmation() {
        let email = OutgoingEmail::purchase_confirmation(
            "lifter@example.com",
            "12",
            &Price::new(25.0, Currency::USD),
        );

        let message = mailer().build_message(&email).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("From: coach@gmail.com"));
        assert!(formatted.contains("To: lifter@example.com"));
        assert!(formatted.contains("Subject: Purchase Confirmation"));
        assert!(formatted.contains("Thank you for purchasing PDF #12."));
    }

    #[tokio::test]
    async fn test_invalid_recipient() {
        let email = OutgoingEmail::new("not an address", "Hi", "body");

        match mailer().build_message(&email) {
            Err(MailError::InvalidAddress(addr)) => assert_eq!(addr, "not an address"),
            other => panic!("expected InvalidAddress, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_invalid_sender_rejected_at_startup() {
        let config = MailConfig::new("coach@gmail.com", "pw").with_from_address("nope");
        assert!(matches!(
            SmtpMailer::new(&config),
            Err(MailError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_starttls_relay() {
        let config = MailConfig::new("user@example.com", "pw").with_relay("smtp.example.com", 587);
        assert!(SmtpMailer::new(&config).is_ok());
    }
}

//! # coach-mail
//!
//! SMTP implementation of [`coach_core::MailSender`] used for purchase
//! confirmations. Defaults target a Gmail account over implicit TLS.

pub mod config;
pub mod smtp;

pub use config::MailConfig;
pub use smtp::SmtpMailer;

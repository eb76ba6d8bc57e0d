//! # Mail Sender Trait
//!
//! Outgoing transactional email and the capability that relays it.

use crate::error::MailResult;
use crate::product::Price;
use async_trait::async_trait;
use std::sync::Arc;

/// A plain-text email addressed to a single recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Confirmation sent after a direct PDF purchase
    pub fn purchase_confirmation(to: impl Into<String>, product_id: &str, price: &Price) -> Self {
        Self::new(
            to,
            "Purchase Confirmation",
            format!(
                "Thank you for purchasing PDF #{}. Your payment of {} was successful.",
                product_id,
                price.display()
            ),
        )
    }
}

/// Mail relay capability.
///
/// Implementations hold a long-lived transport; `send` completes only once
/// the relay has accepted the message.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> MailResult<()>;
}

/// Type alias for a shared mail sender
pub type BoxedMailSender = Arc<dyn MailSender>;

/// Loose `local@domain.tld` shape check used to reject obviously bad input
/// before any side effect. The relay performs the authoritative parse.
pub fn looks_like_email(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !address.chars().any(char::is_whitespace)
}

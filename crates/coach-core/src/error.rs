//! # Error Types
//!
//! Typed errors for the two external capabilities the backend depends on:
//! the payment processor (`PaymentError`) and the mail relay (`MailError`).

use thiserror::Error;

/// Errors raised while resolving a cart or talking to the payment processor
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product id has no entry in the price table
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Non-positive or non-finite amount
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true when the failure originated in the request itself
    /// rather than in the processor.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidRequest(_)
                | PaymentError::ProductNotFound { .. }
                | PaymentError::InvalidPrice { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            // Unknown cart ids are a malformed request, not a missing resource
            PaymentError::ProductNotFound { .. } => 400,
            PaymentError::InvalidPrice { .. } => 400,
            PaymentError::ProviderError { .. } => 502,
            PaymentError::NetworkError(_) => 503,
            PaymentError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

/// Errors raised while composing or relaying an email
#[derive(Debug, Error)]
pub enum MailError {
    /// Mail relay configuration is missing or malformed
    #[error("Mail configuration error: {0}")]
    Configuration(String),

    /// Sender or recipient is not a valid mailbox
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled
    #[error("Failed to build message: {0}")]
    Build(String),

    /// The relay refused or dropped the message
    #[error("Mail transport error: {0}")]
    Transport(String),
}

/// Result type alias for mail operations
pub type MailResult<T> = Result<T, MailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(PaymentError::ProductNotFound {
            product_id: "yoga".into()
        }
        .is_client_error());
        assert!(PaymentError::InvalidRequest("empty cart".into()).is_client_error());
        assert!(!PaymentError::NetworkError("timeout".into()).is_client_error());
        assert!(!PaymentError::ProviderError {
            provider: "stripe".into(),
            message: "card declined".into()
        }
        .is_client_error());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PaymentError::InvalidRequest("test".into()).status_code(),
            400
        );
        assert_eq!(
            PaymentError::ProductNotFound {
                product_id: "x".into()
            }
            .status_code(),
            400
        );
        assert_eq!(
            PaymentError::ProviderError {
                provider: "stripe".into(),
                message: "boom".into()
            }
            .status_code(),
            502
        );
    }

    #[test]
    fn test_mail_error_display() {
        let err = MailError::InvalidAddress("not-an-email".into());
        assert_eq!(err.to_string(), "Invalid email address: not-an-email");
    }
}

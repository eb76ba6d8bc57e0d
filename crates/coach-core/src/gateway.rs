//! # Payment Gateway Trait
//!
//! Seam between the HTTP handlers and the payment processor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PaymentGateway (trait)                    │
//! │  ├── create_checkout()        hosted checkout session       │
//! │  ├── create_payment_intent()  direct charge                 │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!                  │                   │
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │ StripeGateway │   │  test fakes   │
//!          └───────────────┘   └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::order::{CheckoutOrder, CheckoutSession, PaymentIntent, PaymentIntentRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Payment processor capabilities used by the backend.
///
/// Built once at startup and shared by every request.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session and return its redirect URL.
    ///
    /// # Arguments
    /// * `order` - Resolved line items to charge
    /// * `success_url` - URL to redirect after successful payment
    /// * `cancel_url` - URL to redirect if customer cancels
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<CheckoutSession>;

    /// Create a payment intent for a direct purchase.
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> PaymentResult<PaymentIntent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Redirect targets for hosted checkout, derived from the storefront URL
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Storefront URL (e.g., "https://gtcoaching.vercel.app/")
    pub base_url: String,
    /// Query appended on success
    pub success_query: String,
    /// Query appended on cancel
    pub cancel_query: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            success_query: "?success=true".to_string(),
            cancel_query: "?canceled=true".to_string(),
        }
    }

    pub fn success_url(&self) -> String {
        format!("{}{}", self.base_url, self.success_query)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_query)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("https://gtcoaching.vercel.app/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_urls() {
        let urls = CheckoutUrls::new("https://gtcoaching.vercel.app/");

        assert_eq!(urls.success_url(), "https://gtcoaching.vercel.app/?success=true");
        assert_eq!(urls.cancel_url(), "https://gtcoaching.vercel.app/?canceled=true");
    }

    #[test]
    fn test_checkout_urls_without_trailing_slash() {
        let urls = CheckoutUrls::new("http://localhost:3000");

        assert_eq!(urls.success_url(), "http://localhost:3000?success=true");
        assert_eq!(urls.cancel_url(), "http://localhost:3000?canceled=true");
    }
}

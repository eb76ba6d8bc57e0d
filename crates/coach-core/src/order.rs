//! # Order Types
//!
//! Cart, checkout and payment-intent types exchanged with the payment gateway.

use crate::product::Price;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

/// An item in a shopper's cart, as posted by the storefront
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartItem {
    /// Product id (key into the price table)
    pub id: String,
    /// Quantity
    pub quantity: u32,
}

impl CartItem {
    pub fn new(id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

/// A resolved line item referencing a processor-side price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Stripe price id (price_...)
    pub price_id: String,
    /// Quantity
    pub quantity: u32,
}

impl LineItem {
    pub fn new(price_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            price_id: price_id.into(),
            quantity,
        }
    }
}

/// Checkout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    /// One-time payment
    Payment,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
        }
    }
}

/// An order to be sent to hosted checkout
#[derive(Debug, Clone)]
pub struct CheckoutOrder {
    /// Unique order ID (generated), attached to the session metadata
    pub id: String,

    /// Line items
    pub line_items: Vec<LineItem>,

    /// Checkout mode
    pub mode: CheckoutMode,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl CheckoutOrder {
    /// Create a one-time payment order with a generated ID
    pub fn payment(line_items: Vec<LineItem>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            line_items,
            mode: CheckoutMode::Payment,
            created_at: Utc::now(),
        }
    }

    /// Check if order is empty
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Get item count (widened so large carts cannot overflow)
    pub fn item_count(&self) -> u64 {
        self.line_items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// A checkout session created by the payment provider
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Our internal order ID
    pub order_id: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// URL to redirect customer to for payment
    pub checkout_url: String,

    /// When the session expires
    pub expires_at: Option<DateTime<Utc>>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new(
        session_id: impl Into<String>,
        order_id: impl Into<String>,
        provider: impl Into<String>,
        checkout_url: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            order_id: order_id.into(),
            provider: provider.into(),
            checkout_url: checkout_url.into(),
            expires_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Request to authorize a direct charge
#[derive(Debug, Clone)]
pub struct PaymentIntentRequest {
    /// Amount and currency to charge
    pub price: Price,

    /// Address Stripe sends its receipt to
    pub receipt_email: Option<String>,

    /// Custom metadata
    pub metadata: HashMap<String, String>,
}

impl PaymentIntentRequest {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            receipt_email: None,
            metadata: HashMap::new(),
        }
    }

    /// Set receipt email
    pub fn with_receipt_email(mut self, email: impl Into<String>) -> Self {
        self.receipt_email = Some(email.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A payment intent created by the payment provider
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// Provider's payment intent ID (pi_...)
    pub id: String,

    /// Secret the storefront uses to confirm the payment
    pub client_secret: String,

    /// Amount and currency
    pub price: Price,

    /// Provider status (e.g. "requires_payment_method")
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Currency;

    #[test]
    fn test_payment_order() {
        let order = CheckoutOrder::payment(vec![
            LineItem::new("price_a", 2),
            LineItem::new("price_b", 1),
        ]);

        assert_eq!(order.mode, CheckoutMode::Payment);
        assert_eq!(order.item_count(), 3);
        assert!(!order.is_empty());
        assert!(Uuid::parse_str(&order.id).is_ok());
    }

    #[test]
    fn test_item_count_does_not_overflow() {
        let order = CheckoutOrder::payment(vec![
            LineItem::new("price_1R5y0qF1ymj85A8b6TJcqZhY", u32::MAX),
            LineItem::new("price_1RHaelF1ymj85A8bTrxiIaEG", 2),
        ]);

        assert_eq!(order.item_count(), u64::from(u32::MAX) + 2);
    }

    #[test]
    fn test_order_ids_are_unique() {
        let a = CheckoutOrder::payment(Vec::new());
        let b = CheckoutOrder::payment(Vec::new());

        assert!(a.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_checkout_session_new() {
        let session =
            CheckoutSession::new("cs_123", "ord_456", "stripe", "https://checkout.stripe.com/c/pay/cs_123");

        assert_eq!(session.session_id, "cs_123");
        assert_eq!(session.order_id, "ord_456");
        assert!(session.expires_at.is_none());
    }

    #[test]
    fn test_payment_intent_request_builder() {
        let request = PaymentIntentRequest::new(Price::new(25.0, Currency::USD))
            .with_receipt_email("lifter@example.com")
            .with_metadata("pdf_id", "7");

        assert_eq!(request.price.amount, 2500);
        assert_eq!(request.receipt_email.as_deref(), Some("lifter@example.com"));
        assert_eq!(request.metadata.get("pdf_id"), Some(&"7".to_string()));
    }

    #[test]
    fn test_checkout_mode_name() {
        assert_eq!(CheckoutMode::Payment.as_str(), "payment");
    }
}

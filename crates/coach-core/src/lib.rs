//! # coach-core
//!
//! Core types and traits for the GT Coaching payments backend.
//!
//! This crate provides:
//! - `PriceTable` mapping program ids to Stripe price ids
//! - `CartItem`, `LineItem`, `CheckoutOrder` and `PaymentIntentRequest`
//! - `PaymentGateway` and `MailSender` traits for the external services
//! - `PaymentError` and `MailError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use coach_core::{CartItem, CheckoutOrder, CheckoutUrls, PaymentGateway, PriceTable};
//!
//! let prices = PriceTable::builtin();
//! let line_items = prices.resolve(&[CartItem::new("bodybuilding", 1)])?;
//! let order = CheckoutOrder::payment(line_items);
//!
//! let urls = CheckoutUrls::new("https://gtcoaching.vercel.app/");
//! let session = gateway
//!     .create_checkout(&order, &urls.success_url(), &urls.cancel_url())
//!     .await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod error;
pub mod gateway;
pub mod mail;
pub mod order;
pub mod product;

// Re-exports for convenience
pub use error::{MailError, MailResult, PaymentError, PaymentResult};
pub use gateway::{BoxedPaymentGateway, CheckoutUrls, PaymentGateway};
pub use mail::{looks_like_email, BoxedMailSender, MailSender, OutgoingEmail};
pub use order::{
    CartItem, CheckoutMode, CheckoutOrder, CheckoutSession, LineItem, PaymentIntent,
    PaymentIntentRequest,
};
pub use product::{Currency, Price, PriceTable};

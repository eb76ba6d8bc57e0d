//! # coach-stripe
//!
//! Stripe implementation of [`coach_core::PaymentGateway`].
//!
//! - **Checkout Sessions** for carts of catalog prices (`price_...` ids)
//! - **Payment Intents** for direct, amount-based purchases
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coach_stripe::StripeGateway;
//! use coach_core::{PaymentGateway, PaymentIntentRequest, Price, Currency};
//!
//! // Create gateway from environment
//! let gateway = StripeGateway::from_env()?;
//!
//! let intent = gateway
//!     .create_payment_intent(
//!         &PaymentIntentRequest::new(Price::new(25.0, Currency::USD))
//!             .with_receipt_email("lifter@example.com"),
//!     )
//!     .await?;
//!
//! // Hand intent.client_secret to the storefront
//! ```

pub mod config;
pub mod gateway;

// Re-exports
pub use config::StripeConfig;
pub use gateway::StripeGateway;

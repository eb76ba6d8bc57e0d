//! # Application State
//!
//! Shared state for the Axum application: the injected payment gateway and
//! mail sender, the price table, and process configuration.

use anyhow::Context;
use coach_core::{BoxedMailSender, BoxedPaymentGateway, CheckoutUrls, PriceTable};
use coach_mail::SmtpMailer;
use coach_stripe::StripeGateway;
use std::net::SocketAddr;
use std::sync::Arc;

const DEFAULT_CLIENT_URL: &str = "https://gtcoaching.vercel.app/";
const DEFAULT_PORT: u16 = 5000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Storefront URL that checkout redirects back to
    pub client_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Directory served for unmatched GET requests
    pub static_dir: String,
}

impl AppConfig {
    /// Load from environment variables (and `.env` when present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            client_url: lookup("CLIENT_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "public".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment processor
    pub gateway: BoxedPaymentGateway,
    /// Confirmation mail relay
    pub mailer: BoxedMailSender,
    /// Program id -> Stripe price id
    pub prices: Arc<PriceTable>,
    /// Checkout redirect URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build the Stripe gateway and SMTP mailer from the environment.
    ///
    /// Must be called inside the tokio runtime.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let gateway = StripeGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        let mailer = SmtpMailer::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize mail relay: {}", e))?;

        Ok(Self::with_services(
            config,
            Arc::new(gateway),
            Arc::new(mailer),
        ))
    }

    /// Assemble state from already-constructed services
    pub fn with_services(
        config: AppConfig,
        gateway: BoxedPaymentGateway,
        mailer: BoxedMailSender,
    ) -> Self {
        let urls = CheckoutUrls::new(&config.client_url);

        Self {
            gateway,
            mailer,
            prices: Arc::new(PriceTable::builtin()),
            urls,
            config,
        }
    }
}

//! # Stripe Gateway
//!
//! `PaymentGateway` implementation over Stripe's form-encoded REST API:
//! Checkout Sessions for carts and Payment Intents for direct purchases.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coach_core::{
    CheckoutOrder, CheckoutSession, Currency, PaymentError, PaymentGateway, PaymentIntent,
    PaymentIntentRequest, PaymentResult, Price,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe payment gateway
///
/// Holds one pooled HTTP client for the life of the process.
pub struct StripeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(test_mode = config.is_test_mode(), "Stripe gateway ready");

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Form parameters for `POST /v1/checkout/sessions`
    fn checkout_params(
        order: &CheckoutOrder,
        success_url: &str,
        cancel_url: &str,
    ) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), order.mode.as_str().to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
        ];

        for (i, item) in order.line_items.iter().enumerate() {
            form_params.push((format!("line_items[{}][price]", i), item.price_id.clone()));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params.push(("metadata[order_id]".to_string(), order.id.clone()));
        form_params
    }

    /// Form parameters for `POST /v1/payment_intents`
    fn payment_intent_params(request: &PaymentIntentRequest) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), request.price.amount.to_string()),
            (
                "currency".to_string(),
                request.price.currency.as_str().to_string(),
            ),
        ];

        if let Some(ref email) = request.receipt_email {
            form_params.push(("receipt_email".to_string(), email.clone()));
        }

        let mut metadata: Vec<_> = request.metadata.iter().collect();
        metadata.sort();
        for (key, value) in metadata {
            form_params.push((format!("metadata[{}]", key), value.clone()));
        }

        form_params
    }

    /// POST a form to the Stripe API and decode the JSON response.
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form_params: &[(String, String)],
    ) -> PaymentResult<T> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: path={}, status={}, body={}", path, status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.describe(),
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<CheckoutSession> {
        if order.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "Order has no items".to_string(),
            ));
        }

        let form_params = Self::checkout_params(order, success_url, cancel_url);

        debug!(
            "Creating Stripe checkout session: {} items, mode={}",
            order.line_items.len(),
            order.mode.as_str()
        );

        let session: StripeCheckoutSessionResponse =
            self.post_form("/v1/checkout/sessions", &form_params).await?;

        let checkout_url = session
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("Checkout session {} has no url", session.id),
            })?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session.id, checkout_url
        );

        let mut checkout = CheckoutSession::new(session.id, order.id.clone(), PROVIDER, checkout_url);
        checkout.expires_at = session
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));
        Ok(checkout)
    }

    #[instrument(skip(self, request), fields(amount = request.price.amount, currency = %request.price.currency))]
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> PaymentResult<PaymentIntent> {
        if !request.price.is_positive() {
            return Err(PaymentError::InvalidPrice {
                message: format!("amount must be positive, got {}", request.price.amount),
            });
        }

        let form_params = Self::payment_intent_params(request);

        let intent: StripePaymentIntentResponse =
            self.post_form("/v1/payment_intents", &form_params).await?;

        let client_secret = intent
            .client_secret
            .ok_or_else(|| PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("Payment intent {} has no client_secret", intent.id),
            })?;

        info!(
            "Created Stripe payment intent: id={}, amount={}, status={}",
            intent.id, intent.amount, intent.status
        );

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
            price: Price::from_cents(intent.amount, intent.currency),
            status: intent.status,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    amount: i64,
    currency: Currency,
    status: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl StripeError {
    fn describe(&self) -> String {
        match &self.code {
            Some(code) => format!("{} ({})", self.message, code),
            None => self.message.clone(),
        }
    }
}

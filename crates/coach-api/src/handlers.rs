//! # Request Handlers
//!
//! Axum request handlers for hosted checkout and direct PDF purchases.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use coach_core::{
    looks_like_email, CartItem, CheckoutOrder, Currency, OutgoingEmail, PaymentError,
    PaymentIntentRequest, Price,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, instrument, warn};

const CHECKOUT_FAILED: &str = "Stripe checkout failed";
const PURCHASE_FAILED: &str = "Payment failed or email could not be sent.";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout session request
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutSessionRequest {
    /// Cart contents
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// Create checkout session response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutSessionResponse {
    /// Hosted checkout URL (redirect user here)
    pub url: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Direct purchase request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Payer email (receipt + confirmation)
    pub email: String,
    /// Purchased PDF id; storefronts send it as a string or a number
    #[serde(deserialize_with = "string_or_number")]
    pub pdf_id: String,
    /// Amount in major currency units (dollars)
    pub amount: f64,
}

/// Direct purchase success response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub success: bool,
    pub client_secret: String,
}

/// Direct purchase failure response.
///
/// When the charge was created but the confirmation could not be sent,
/// `payment_intent_id` and `email_sent` let the caller reconcile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
}

impl PurchaseErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            payment_intent_id: None,
            email_sent: None,
        }
    }

    /// Charge exists but the confirmation email was not delivered
    pub fn unconfirmed(payment_intent_id: impl Into<String>) -> Self {
        Self {
            payment_intent_id: Some(payment_intent_id.into()),
            email_sent: Some(false),
            ..Self::new(PURCHASE_FAILED)
        }
    }
}

type CheckoutError = (StatusCode, Json<ErrorResponse>);
type PurchaseError = (StatusCode, Json<PurchaseErrorResponse>);

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Client mistakes keep their message and status; processor failures
/// collapse to an opaque 500.
fn checkout_error_response(err: &PaymentError) -> CheckoutError {
    if err.is_client_error() {
        let code = err.status_code();
        return (
            StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST),
            Json(ErrorResponse::new(err.to_string(), code)),
        );
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(CHECKOUT_FAILED, 500)),
    )
}

fn purchase_bad_request(message: impl Into<String>) -> PurchaseError {
    (
        StatusCode::BAD_REQUEST,
        Json(PurchaseErrorResponse::new(message)),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Liveness probe
pub async fn liveness() -> &'static str {
    "🛠️ GT Coaching Backend is Live!"
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "gt-coaching",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a hosted checkout session for a cart of coaching programs
#[instrument(skip(state, payload))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<Json<CreateCheckoutSessionResponse>, CheckoutError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected checkout body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(rejection.body_text(), 400)),
        )
    })?;

    let line_items = state.prices.resolve(&request.items).map_err(|e| {
        warn!("Rejected cart: {}", e);
        checkout_error_response(&e)
    })?;

    let order = CheckoutOrder::payment(line_items);
    let success_url = state.urls.success_url();
    let cancel_url = state.urls.cancel_url();

    info!(
        "Creating checkout: order={}, {} items, success_url={}",
        order.id,
        order.item_count(),
        success_url
    );

    let session = state
        .gateway
        .create_checkout(&order, &success_url, &cancel_url)
        .await
        .map_err(|e| {
            error!("Stripe error: {}", e);
            checkout_error_response(&e)
        })?;

    info!("Created checkout session: {}", session.session_id);

    Ok(Json(CreateCheckoutSessionResponse {
        url: session.checkout_url,
    }))
}

/// Charge for a PDF and email a confirmation.
///
/// The email is only attempted once the payment intent exists. A relay
/// failure after that point still answers 500, with the intent id attached.
#[instrument(skip(state, payload))]
pub async fn purchase(
    State(state): State<AppState>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Json<PurchaseResponse>, PurchaseError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected purchase body: {}", rejection.body_text());
        purchase_bad_request(rejection.body_text())
    })?;

    let price = Price::from_major_units(request.amount, Currency::USD)
        .map_err(|e| purchase_bad_request(e.to_string()))?;

    if !looks_like_email(&request.email) {
        return Err(purchase_bad_request(format!(
            "Invalid email address: {}",
            request.email
        )));
    }

    if request.pdf_id.trim().is_empty() {
        return Err(purchase_bad_request("pdfId is required"));
    }

    let intent_request = PaymentIntentRequest::new(price.clone())
        .with_receipt_email(request.email.as_str())
        .with_metadata("pdf_id", request.pdf_id.as_str());

    let intent = state
        .gateway
        .create_payment_intent(&intent_request)
        .await
        .map_err(|e| {
            error!("Payment error: {}", e);
            if e.is_client_error() {
                purchase_bad_request(e.to_string())
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(PurchaseErrorResponse::new(PURCHASE_FAILED)),
                )
            }
        })?;

    info!(
        "Created payment intent: id={}, pdf={}, amount={}",
        intent.id,
        request.pdf_id,
        price.display()
    );

    let confirmation = OutgoingEmail::purchase_confirmation(&request.email, &request.pdf_id, &price);

    if let Err(e) = state.mailer.send(&confirmation).await {
        error!(
            payment_intent_id = %intent.id,
            "Confirmation email failed after payment intent was created: {}", e
        );
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(PurchaseErrorResponse::unconfirmed(intent.id)),
        ));
    }

    Ok(Json(PurchaseResponse {
        success: true,
        client_secret: intent.client_secret,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_checkout_error_mapping() {
        let (status, Json(body)) = checkout_error_response(&PaymentError::ProductNotFound {
            product_id: "yoga".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Product not found: yoga");

        let (status, Json(body)) = checkout_error_response(&PaymentError::NetworkError(
            "connection reset".to_string(),
        ));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, CHECKOUT_FAILED);
        assert_eq!(body.code, 500);
    }

    #[test]
    fn test_purchase_request_accepts_numeric_pdf_id() {
        let request: PurchaseRequest = serde_json::from_value(serde_json::json!({
            "email": "lifter@example.com",
            "pdfId": 3,
            "amount": 25
        }))
        .unwrap();

        assert_eq!(request.pdf_id, "3");
        assert_eq!(request.amount, 25.0);

        let request: PurchaseRequest = serde_json::from_value(serde_json::json!({
            "email": "lifter@example.com",
            "pdfId": "meal-plan",
            "amount": 9.99
        }))
        .unwrap();
        assert_eq!(request.pdf_id, "meal-plan");
    }

    #[test]
    fn test_purchase_request_rejects_object_pdf_id() {
        let result = serde_json::from_value::<PurchaseRequest>(serde_json::json!({
            "email": "lifter@example.com",
            "pdfId": { "id": 3 },
            "amount": 25
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_purchase_error_shapes() {
        let generic = serde_json::to_value(PurchaseErrorResponse::new(PURCHASE_FAILED)).unwrap();
        assert_eq!(
            generic,
            serde_json::json!({ "success": false, "error": PURCHASE_FAILED })
        );

        let unconfirmed = serde_json::to_value(PurchaseErrorResponse::unconfirmed("pi_1")).unwrap();
        assert_eq!(
            unconfirmed,
            serde_json::json!({
                "success": false,
                "error": PURCHASE_FAILED,
                "paymentIntentId": "pi_1",
                "emailSent": false
            })
        );
    }
}

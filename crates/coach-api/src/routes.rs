//! # Routes
//!
//! Axum router configuration for the backend.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET  /                         - Liveness text
///   - GET  /health                   - Health check (JSON)
///   - POST /create-checkout-session  - Hosted checkout for a cart
///   - POST /purchase                 - Direct PDF purchase + confirmation email
///
/// Anything else is served from the static directory.
pub fn create_router(state: AppState) -> Router {
    // The storefront is hosted on a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(handlers::liveness))
        .route("/health", get(handlers::health))
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .route("/purchase", post(handlers::purchase))
        .fallback_service(static_files)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

//! # coach-api
//!
//! HTTP API layer for the GT Coaching backend.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Liveness text |
//! | GET | `/health` | Health check |
//! | POST | `/create-checkout-session` | Hosted checkout for a cart |
//! | POST | `/purchase` | Direct PDF purchase with email confirmation |

pub mod handlers;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

pub use routes::create_router;
pub use state::{AppConfig, AppState};

//! # GT Coaching Backend
//!
//! Checkout and PDF purchase API in front of Stripe and an SMTP relay.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables (or put them in .env)
//! export STRIPE_SECRET_KEY=sk_test_...
//! export EMAIL_USER=coach@gmail.com
//! export EMAIL_PASS=app-password
//!
//! # Run the server
//! gt-coaching
//! ```

use coach_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Programs priced: {}", state.prices.product_ids().join(", "));
    info!("Payment provider: {}", state.gateway.provider_name());
    info!("Checkout redirects to: {}", state.config.client_url);

    // Create router
    let app = routes::create_router(state);

    info!("🚀 Server is running on port {}", addr.port());

    if !is_prod {
        info!("💳 Checkout: POST http://{}/create-checkout-session", addr);
        info!("📄 Purchase: POST http://{}/purchase", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filters (default `info`); `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

fn print_banner() {
    println!(
        r#"
  🏋️ GT Coaching Backend
  ━━━━━━━━━━━━━━━━━━━━━━━
  Checkout & PDF purchases
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}

//! # Paygate
//!
//! Payment integration service: Stripe checkout/intents, PayPal orders and
//! signed payment webhooks.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export PAYPAL_CLIENT_ID=...
//! export PAYPAL_SECRET_KEY=...
//! export PAYMENTS_HTTP_ADDR=0.0.0.0:8080
//!
//! # Run the server
//! paygate
//! ```

use pay_api::{routes, AppConfig, AppState, LogFormat};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    init_tracing(config.log_format);
    print_banner();

    // Missing credentials stop the process here, not on first request
    let state = AppState::from_env(config)?;

    let addr = state.config.addr;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment providers: {:?}", state.providers.providers());

    let app = routes::create_router(state);

    info!("Paygate starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Checkout: POST http://{}/create-checkout-session", addr);
        info!("Webhook: POST http://{}/webhook/stripe/payment-success", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

fn print_banner() {
    println!(
        r#"
  Paygate
  ━━━━━━━━━━━━━━━━━━━━━━━
  Stripe + PayPal payment gateway
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

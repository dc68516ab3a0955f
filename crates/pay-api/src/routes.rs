//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Largest webhook body accepted before answering 413
pub const MAX_WEBHOOK_BODY_BYTES: usize = 65_536;

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - POST /create-checkout-session - Stripe Checkout Session
/// - POST /create-payment-intent - Stripe PaymentIntent
/// - POST /create-paypal-order - PayPal order approval URL
/// - POST /webhook/{processor}/payment-success - Signed payment webhooks
pub fn create_router(state: AppState) -> Router {
    // Browser checkouts call the creation routes cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payment_routes = Router::new()
        .route("/create-checkout-session", post(handlers::create_checkout_session))
        .route("/create-payment-intent", post(handlers::create_payment_intent))
        .route("/create-paypal-order", post(handlers::create_paypal_order))
        .layer(cors);

    // Webhook routes (no CORS, raw body with a hard size cap)
    let webhook_routes = Router::new()
        .route(
            "/{processor}/payment-success",
            post(handlers::payment_success_webhook),
        )
        .layer(DefaultBodyLimit::max(MAX_WEBHOOK_BODY_BYTES));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(payment_routes)
        .nest("/webhook", webhook_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

//! # pay-api
//!
//! HTTP API layer for paygate-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Payment creation endpoints backed by Stripe and PayPal
//! - Signed webhook endpoint for payment-success notifications
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/create-checkout-session` | Stripe Checkout Session → `{id}` |
//! | POST | `/create-payment-intent` | Stripe PaymentIntent → `{clientSecret}` |
//! | POST | `/create-paypal-order` | PayPal order → `{approvalUrl}` |
//! | POST | `/webhook/{processor}/payment-success` | Signed webhook |

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::{create_router, MAX_WEBHOOK_BODY_BYTES};
pub use state::{AppConfig, AppState, LogFormat};

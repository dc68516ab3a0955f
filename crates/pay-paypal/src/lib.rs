//! # pay-paypal
//!
//! PayPal order-approval provider for paygate-rs.
//!
//! PayPal is redirect-only here: `create_checkout_session` returns the URL
//! the payer must visit to approve the order. Payment intents and webhooks
//! report `PaymentError::UnsupportedOperation`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_paypal::PaypalProvider;
//! use pay_core::{PaymentProvider, PaymentRequest};
//!
//! let provider = PaypalProvider::from_env()?;
//! let approval = provider.create_checkout_session(&request).await?;
//!
//! // Redirect the payer to approval.id
//! ```

pub mod auth;
pub mod config;
pub mod provider;

// Re-exports
pub use auth::{fetch_access_token, AccessToken};
pub use config::{PaypalConfig, LIVE_API_BASE_URL, SANDBOX_API_BASE_URL};
pub use provider::{find_approval_link, LinkDescription, PaypalProvider, APPROVAL_RELS};

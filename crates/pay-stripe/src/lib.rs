//! # pay-stripe
//!
//! Stripe payment provider for paygate-rs.
//!
//! Implements every `PaymentProvider` capability:
//!
//! 1. **Checkout Sessions** - hosted payment page, single line item,
//!    `order_id`/`store_id` propagated as PaymentIntent metadata
//! 2. **PaymentIntents** - client secret for Stripe.js / mobile SDKs
//! 3. **Webhooks** - `Stripe-Signature` HMAC verification with replay
//!    tolerance, `payment_intent.succeeded` normalization
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::StripeProvider;
//! use pay_core::{PaymentProvider, PaymentRequest};
//!
//! let provider = StripeProvider::from_env()?;
//!
//! let session = provider
//!     .create_checkout_session(&PaymentRequest::new(2000, "eur"))
//!     .await?;
//!
//! // In your webhook endpoint:
//! let event = provider.handle_payment_success(&body, signature).await?;
//! ```

pub mod config;
pub mod provider;
pub mod webhook;

// Re-exports
pub use config::StripeConfig;
pub use provider::{StripeProvider, LINE_ITEM_NAME};
pub use webhook::{WebhookVerifier, PAYMENT_SUCCEEDED_EVENT, SIGNATURE_HEADER};

//! # pay-core
//!
//! Core types and traits for the paygate payment integration layer.
//!
//! This crate provides:
//! - `PaymentProvider` trait every processor adapter implements
//! - `ProviderRegistry` for looking providers up by name
//! - `PaymentRequest` and the normalized result types
//! - `PaymentError` for typed error handling
//! - `retry` for idempotent upstream calls
//! - `PaymentEventHandler` as the hook for verified webhook events
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{PaymentProvider, PaymentRequest, ProviderRegistry};
//!
//! let request = PaymentRequest::new(2000, "")
//!     .with_default_currency()
//!     .with_urls("https://shop.example/success", "https://shop.example/cancel")
//!     .with_ids("order-42", "store-7");
//! request.validate()?;
//!
//! let provider = registry.get("stripe").unwrap();
//! let session = provider.create_checkout_session(&request).await?;
//! ```

pub mod error;
pub mod events;
pub mod money;
pub mod provider;
pub mod request;
pub mod retry;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use events::{LoggingEventHandler, PaymentEventHandler};
pub use money::{decimal_places, format_major_units};
pub use provider::{BoxedPaymentProvider, Capability, PaymentProvider, ProviderRegistry};
pub use request::{
    CheckoutSessionResult, PaymentIntentResult, PaymentRequest, PaymentSuccessEvent,
    DEFAULT_CURRENCY, ORDER_ID_KEY, STORE_ID_KEY,
};
pub use retry::{retry, RetryPolicy};

//! # Payment Provider Trait
//!
//! The capability contract every payment processor adapter satisfies.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentProvider (trait)                    │
//! │  ├── create_checkout_session()                              │
//! │  ├── create_payment_intent()                                │
//! │  ├── handle_payment_success()                               │
//! │  └── provider_name() / signature_header() / supports()      │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │StripeProvider │   │PaypalProvider │
//!          │  (all three)  │   │(checkout only)│
//!          └───────────────┘   └───────────────┘
//! ```
//!
//! Operations a processor cannot perform fall through to the default
//! bodies, which return [`PaymentError::UnsupportedOperation`]. Callers
//! branch on that variant (or on [`PaymentProvider::supports`]) instead of
//! matching error strings.

use crate::error::{PaymentError, PaymentResult};
use crate::request::{
    CheckoutSessionResult, PaymentIntentResult, PaymentRequest, PaymentSuccessEvent,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An operation a provider may or may not implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CheckoutSession,
    PaymentIntent,
    Webhook,
}

impl Capability {
    /// Operation name used in errors and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CheckoutSession => "create_checkout_session",
            Capability::PaymentIntent => "create_payment_intent",
            Capability::Webhook => "handle_payment_success",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core trait for payment processor adapters.
#[async_trait]
#[allow(unused_variables)]
pub trait PaymentProvider: Send + Sync {
    /// Provider name (for logging and routing).
    fn provider_name(&self) -> &'static str;

    /// Whether this provider implements `capability`.
    fn supports(&self, capability: Capability) -> bool;

    /// Inbound header that carries the webhook signature.
    fn signature_header(&self) -> &'static str {
        "signature"
    }

    /// Create a hosted checkout and return the reference the client
    /// redirects to (session id or approval URL).
    async fn create_checkout_session(
        &self,
        request: &PaymentRequest,
    ) -> PaymentResult<CheckoutSessionResult> {
        Err(self.unsupported(Capability::CheckoutSession))
    }

    /// Create a payment intent and return its client secret.
    async fn create_payment_intent(
        &self,
        request: &PaymentRequest,
    ) -> PaymentResult<PaymentIntentResult> {
        Err(self.unsupported(Capability::PaymentIntent))
    }

    /// Verify a signed webhook and extract the payment-success fields.
    ///
    /// Fails with `WebhookVerificationFailed` when the signature does not
    /// check out and `UnknownEventType` for verified events we ignore.
    async fn handle_payment_success(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> PaymentResult<PaymentSuccessEvent> {
        Err(self.unsupported(Capability::Webhook))
    }

    /// Build the typed error for an operation this provider lacks.
    fn unsupported(&self, capability: Capability) -> PaymentError {
        PaymentError::UnsupportedOperation {
            provider: self.provider_name(),
            operation: capability.as_str(),
        }
    }
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;

/// Registry of configured providers, keyed by provider name.
///
/// Built once at startup and only read afterwards.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, BoxedPaymentProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name
    pub fn register(&mut self, provider: BoxedPaymentProvider) {
        let name = provider.provider_name().to_string();
        self.providers.insert(name, provider);
    }

    /// Register with builder pattern
    pub fn with_provider(mut self, provider: BoxedPaymentProvider) -> Self {
        self.register(provider);
        self
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&BoxedPaymentProvider> {
        self.providers.get(name)
    }

    /// List all registered providers
    pub fn providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }
}

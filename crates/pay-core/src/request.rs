//! # Payment Request Types
//!
//! Normalized request and result types shared by every provider.
//! Nothing here outlives a single HTTP request or webhook delivery.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Currency used when the caller leaves `currency` empty
pub const DEFAULT_CURRENCY: &str = "eur";

/// Metadata key carrying the caller's order identifier
pub const ORDER_ID_KEY: &str = "order_id";

/// Metadata key carrying the caller's store identifier
pub const STORE_ID_KEY: &str = "store_id";

/// A payment request decoded from an inbound HTTP body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Amount in smallest currency unit (cents for EUR)
    pub amount: i64,

    /// ISO 4217 currency code
    pub currency: String,

    /// Where the processor sends the payer after paying
    pub success_url: String,

    /// Where the processor sends the payer after cancelling
    pub cancel_url: String,

    /// Opaque caller order identifier, passed through as metadata
    pub order_id: String,

    /// Opaque caller store identifier, passed through as metadata
    pub store_id: String,
}

impl PaymentRequest {
    /// Create a request for an amount and currency
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            ..Default::default()
        }
    }

    /// Set redirect targets
    pub fn with_urls(
        mut self,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        self.success_url = success_url.into();
        self.cancel_url = cancel_url.into();
        self
    }

    /// Set correlation identifiers
    pub fn with_ids(mut self, order_id: impl Into<String>, store_id: impl Into<String>) -> Self {
        self.order_id = order_id.into();
        self.store_id = store_id.into();
        self
    }

    /// Substitute [`DEFAULT_CURRENCY`] for an empty currency
    pub fn with_default_currency(mut self) -> Self {
        if self.currency.trim().is_empty() {
            self.currency = DEFAULT_CURRENCY.to_string();
        }
        self
    }

    /// Reject requests no processor can charge
    pub fn validate(&self) -> PaymentResult<()> {
        if self.amount <= 0 {
            return Err(PaymentError::InvalidRequest("Invalid amount".to_string()));
        }
        Ok(())
    }

    /// Correlation metadata attached to the processor's payment object
    pub fn metadata(&self) -> HashMap<&'static str, &str> {
        HashMap::from([
            (ORDER_ID_KEY, self.order_id.as_str()),
            (STORE_ID_KEY, self.store_id.as_str()),
        ])
    }
}

/// Processor-assigned checkout reference.
///
/// A session identifier for hosted checkout, or the approval URL for
/// redirect-based processors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionResult {
    pub id: String,
}

/// Client secret a browser SDK uses to confirm a payment intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntentResult {
    pub client_secret: String,
}

/// The fields of a verified payment-success webhook we act on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSuccessEvent {
    /// Processor payment identifier
    pub id: String,
    /// Amount in smallest currency unit
    pub amount: i64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Caller order identifier recovered from metadata
    pub order_id: String,
}

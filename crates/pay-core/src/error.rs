//! # Payment Error Types
//!
//! Typed error handling for the paygate integration layer.
//! All provider operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider does not implement this capability
    #[error("Operation {operation} is not supported by {provider}")]
    UnsupportedOperation {
        provider: &'static str,
        operation: &'static str,
    },

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Verified webhook whose type we do not handle
    #[error("Unhandled webhook event type: {event_type}")]
    UnknownEventType { event_type: String },

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Upstream call exceeded its deadline
    #[error("Timed out after {seconds}s waiting for {operation}")]
    Timeout { operation: String, seconds: u64 },

    /// Order was created but carries no link the payer can be sent to
    #[error("No approval link in {provider} order {order_id}")]
    MissingApprovalLink { provider: String, order_id: String },

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::NetworkError(_) | PaymentError::Timeout { .. }
        )
    }

    /// Returns true for a verified webhook event we deliberately ignore
    pub fn is_unknown_event_type(&self) -> bool {
        matches!(self, PaymentError::UnknownEventType { .. })
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::UnsupportedOperation { .. } => 501,
            PaymentError::WebhookVerificationFailed(_) => 400,
            PaymentError::UnknownEventType { .. } => 200,
            PaymentError::WebhookParseError(_) => 400,
            PaymentError::ProviderError { .. } => 500,
            PaymentError::NetworkError(_) => 500,
            PaymentError::Timeout { .. } => 500,
            PaymentError::MissingApprovalLink { .. } => 500,
            PaymentError::Internal(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Message safe to hand back to an HTTP caller.
    ///
    /// Upstream and internal details stay in the server logs.
    pub fn client_message(&self) -> String {
        match self {
            PaymentError::InvalidRequest(msg) => msg.clone(),
            PaymentError::UnsupportedOperation { .. } => "Operation not supported".to_string(),
            PaymentError::WebhookVerificationFailed(_) => {
                "Webhook signature verification failed".to_string()
            }
            PaymentError::WebhookParseError(_) => "Malformed webhook payload".to_string(),
            PaymentError::UnknownEventType { .. } => "Event ignored".to_string(),
            PaymentError::Timeout { .. } => "Payment provider timed out".to_string(),
            _ => "Payment provider request failed".to_string(),
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(PaymentError::NetworkError("connection reset".into()).is_retryable());
        assert!(PaymentError::Timeout {
            operation: "paypal token".into(),
            seconds: 30
        }
        .is_retryable());
        assert!(!PaymentError::InvalidRequest("bad data".into()).is_retryable());
        assert!(!PaymentError::ProviderError {
            provider: "stripe".into(),
            message: "card declined".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PaymentError::InvalidRequest("test".into()).status_code(),
            400
        );
        assert_eq!(
            PaymentError::WebhookVerificationFailed("mismatch".into()).status_code(),
            400
        );
        assert_eq!(
            PaymentError::UnsupportedOperation {
                provider: "paypal",
                operation: "create_payment_intent"
            }
            .status_code(),
            501
        );
        assert_eq!(
            PaymentError::MissingApprovalLink {
                provider: "paypal".into(),
                order_id: "5O1".into()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_unknown_event_type_detection() {
        let err = PaymentError::UnknownEventType {
            event_type: "charge.refunded".into(),
        };
        assert!(err.is_unknown_event_type());
        assert!(!PaymentError::WebhookVerificationFailed("x".into()).is_unknown_event_type());
    }

    #[test]
    fn test_client_message_hides_upstream_detail() {
        let err = PaymentError::ProviderError {
            provider: "stripe".into(),
            message: "Invalid API Key provided: sk_test_***abc".into(),
        };
        assert!(!err.client_message().contains("sk_test"));

        let err = PaymentError::InvalidRequest("Invalid amount".into());
        assert_eq!(err.client_message(), "Invalid amount");
    }
}

//! # Payment Event Handling
//!
//! Hook invoked after a webhook has been verified and normalized.
//! Fulfilment, persistence or order bookkeeping plug in here; the service
//! itself keeps no state between deliveries.

use crate::error::PaymentResult;
use crate::request::PaymentSuccessEvent;
use tracing::info;

/// Receives verified payment-success events.
///
/// Returning an error makes the webhook endpoint answer with a 5xx so the
/// processor re-delivers the event.
pub trait PaymentEventHandler: Send + Sync {
    fn on_payment_succeeded(
        &self,
        provider: &str,
        event: &PaymentSuccessEvent,
    ) -> PaymentResult<()>;
}

/// Default handler (just logs events)
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventHandler;

impl PaymentEventHandler for LoggingEventHandler {
    fn on_payment_succeeded(
        &self,
        provider: &str,
        event: &PaymentSuccessEvent,
    ) -> PaymentResult<()> {
        info!(
            provider,
            payment_id = %event.id,
            order_id = %event.order_id,
            amount = event.amount,
            currency = %event.currency,
            "successful payment handled"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_handler_accepts_event() {
        let event = PaymentSuccessEvent {
            id: "pi_123".into(),
            amount: 2000,
            currency: "eur".into(),
            order_id: "o1".into(),
        };
        assert!(LoggingEventHandler.on_payment_succeeded("stripe", &event).is_ok());
    }
}

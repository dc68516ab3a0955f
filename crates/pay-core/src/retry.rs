//! # Bounded Retry
//!
//! Exponential backoff for idempotent, read-type provider calls
//! (OAuth token exchange and the like).
//!
//! Never wrap a payment-creation call in [`retry`]: without an idempotency
//! key a retried create can charge the payer twice.

use crate::error::PaymentResult;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often and how patiently to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_backoff: Duration,
    /// Upper bound for the doubled delay
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Run the operation exactly once
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
        }
    }
}

/// Run `f` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, operation: &str, mut f: F) -> PaymentResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PaymentResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying provider call"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

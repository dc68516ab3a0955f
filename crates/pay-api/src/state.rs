//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the configured payment providers, the event hook and
//! process-wide configuration. Everything here is read-only after startup.

use pay_core::{
    BoxedPaymentProvider, LoggingEventHandler, PaymentError, PaymentEventHandler, PaymentResult,
    ProviderRegistry,
};
use pay_paypal::{PaypalConfig, PaypalProvider};
use pay_stripe::{StripeConfig, StripeProvider};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to listen on
    pub addr: SocketAddr,
    /// Deadline for every call into a payment provider
    pub upstream_timeout: Duration,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from environment variables
    ///
    /// - `PAYMENTS_HTTP_ADDR` (default `127.0.0.1:8080`)
    /// - `UPSTREAM_TIMEOUT_SECS` (default 30)
    /// - `ENVIRONMENT` (default `development`)
    /// - `LOG_FORMAT` (`json` or `pretty`)
    pub fn from_env() -> PaymentResult<Self> {
        dotenvy::dotenv().ok();

        let addr = std::env::var("PAYMENTS_HTTP_ADDR")
            .unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string());
        let addr = addr.parse().map_err(|_| {
            PaymentError::Configuration(format!(
                "PAYMENTS_HTTP_ADDR is not a socket address: {}",
                addr
            ))
        })?;

        let upstream_timeout = match std::env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map(Duration::from_secs).map_err(|_| {
                PaymentError::Configuration(format!(
                    "UPSTREAM_TIMEOUT_SECS is not a number: {}",
                    raw
                ))
            })?,
            Err(_) => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            addr,
            upstream_timeout,
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            log_format,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configured payment providers
    pub providers: ProviderRegistry,
    /// Receives verified payment-success events
    pub events: Arc<dyn PaymentEventHandler>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from already-built providers
    pub fn new(config: AppConfig, providers: ProviderRegistry) -> Self {
        Self {
            providers,
            events: Arc::new(LoggingEventHandler),
            config,
        }
    }

    /// Build Stripe and PayPal providers from the environment.
    ///
    /// Fails on the first missing or malformed credential.
    pub fn from_env(config: AppConfig) -> PaymentResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Build both providers from credentials resolved through `lookup`
    pub fn from_lookup(
        config: AppConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> PaymentResult<Self> {
        let stripe = StripeProvider::new(
            StripeConfig::from_lookup(&lookup)?.with_request_timeout(config.upstream_timeout),
        )?;
        let paypal = PaypalProvider::new(
            PaypalConfig::from_lookup(&lookup)?.with_request_timeout(config.upstream_timeout),
        )?;

        let providers = ProviderRegistry::new()
            .with_provider(Arc::new(stripe))
            .with_provider(Arc::new(paypal));

        Ok(Self::new(config, providers))
    }

    /// Builder: replace the payment event hook
    pub fn with_event_handler(mut self, handler: Arc<dyn PaymentEventHandler>) -> Self {
        self.events = handler;
        self
    }

    /// Get a specific payment provider
    pub fn provider(&self, name: &str) -> Option<&BoxedPaymentProvider> {
        self.providers.get(name)
    }

    /// Run a provider call under the upstream deadline.
    ///
    /// The wrapped future is dropped on expiry, which aborts the outbound
    /// HTTP request along with it.
    pub async fn call_upstream<T, F>(&self, operation: &'static str, call: F) -> PaymentResult<T>
    where
        F: Future<Output = PaymentResult<T>>,
    {
        let deadline = self.config.upstream_timeout;
        tokio::time::timeout(deadline, call)
            .await
            .unwrap_or_else(|_| {
                Err(PaymentError::Timeout {
                    operation: operation.to_string(),
                    seconds: deadline.as_secs(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert!(!config.is_production());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    const CREDENTIALS: [(&str, &str); 4] = [
        ("STRIPE_SECRET_KEY", "sk_test_abc"),
        ("STRIPE_WEBHOOK_SECRET", "whsec_x"),
        ("PAYPAL_CLIENT_ID", "client"),
        ("PAYPAL_SECRET_KEY", "secret"),
    ];

    #[test]
    fn test_from_lookup_registers_both_providers() {
        let state = AppState::from_lookup(AppConfig::default(), vars(&CREDENTIALS)).unwrap();
        assert_eq!(state.providers.providers(), vec!["paypal", "stripe"]);
    }

    #[test]
    fn test_each_missing_credential_fails_fast() {
        for skipped in 0..CREDENTIALS.len() {
            let present: Vec<_> = CREDENTIALS
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skipped)
                .map(|(_, pair)| *pair)
                .collect();

            let result = AppState::from_lookup(AppConfig::default(), vars(&present));
            assert!(
                matches!(result, Err(PaymentError::Configuration(_))),
                "started without {}",
                CREDENTIALS[skipped].0
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_upstream_deadline() {
        let config = AppConfig {
            upstream_timeout: Duration::from_secs(5),
            ..AppConfig::default()
        };
        let state = AppState::new(config, ProviderRegistry::new());

        let result: PaymentResult<()> = state
            .call_upstream("slow", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(PaymentError::Timeout { seconds: 5, .. })));

        let result = state.call_upstream("fast", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}

//! # PayPal Configuration
//!
//! OAuth client credentials and endpoint settings for the PayPal REST API.

use pay_core::PaymentError;
use std::env;
use std::time::Duration;

/// PayPal sandbox REST endpoint
pub const SANDBOX_API_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

/// PayPal live REST endpoint
pub const LIVE_API_BASE_URL: &str = "https://api-m.paypal.com";

/// PayPal API configuration
#[derive(Debug, Clone)]
pub struct PaypalConfig {
    /// REST app client ID
    pub client_id: String,

    /// REST app secret
    pub client_secret: String,

    /// API base URL (sandbox, live, or a mock)
    pub api_base_url: String,

    /// Per-call timeout for outbound API requests
    pub request_timeout: Duration,
}

impl PaypalConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYPAL_CLIENT_ID`
    /// - `PAYPAL_SECRET_KEY`
    ///
    /// Optional:
    /// - `PAYPAL_API_BASE_URL` (defaults to the sandbox)
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PaymentError> {
        let client_id = required(&lookup, "PAYPAL_CLIENT_ID")?;
        let client_secret = required(&lookup, "PAYPAL_SECRET_KEY")?;

        let mut config = Self::new(client_id, client_secret);
        if let Some(url) = lookup("PAYPAL_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }
        Ok(config)
    }

    /// Create config with explicit values, pointed at the sandbox
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url: SANDBOX_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn is_sandbox(&self) -> bool {
        self.api_base_url == SANDBOX_API_BASE_URL
    }

    /// Builder: set custom API base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set outbound request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn required(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<String, PaymentError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| PaymentError::Configuration(format!("{} not set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_to_sandbox() {
        let config = PaypalConfig::new("client", "secret");
        assert!(config.is_sandbox());
        assert_eq!(config.api_base_url, SANDBOX_API_BASE_URL);
    }

    #[test]
    fn test_custom_base_url() {
        let config = PaypalConfig::new("client", "secret")
            .with_api_base_url(format!("{}/", LIVE_API_BASE_URL));
        assert!(!config.is_sandbox());
        assert_eq!(config.api_base_url, LIVE_API_BASE_URL);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = PaypalConfig::from_lookup(vars(&[
            ("PAYPAL_CLIENT_ID", "client"),
            ("PAYPAL_SECRET_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "client");
        assert!(config.is_sandbox());
    }

    #[test]
    fn test_missing_or_blank_credentials_fail() {
        let cases = [
            vec![("PAYPAL_SECRET_KEY", "secret")],
            vec![("PAYPAL_CLIENT_ID", "client")],
            vec![("PAYPAL_CLIENT_ID", ""), ("PAYPAL_SECRET_KEY", "secret")],
            vec![("PAYPAL_CLIENT_ID", "client"), ("PAYPAL_SECRET_KEY", "  ")],
        ];

        for case in cases {
            let result = PaypalConfig::from_lookup(vars(&case));
            assert!(
                matches!(result, Err(PaymentError::Configuration(_))),
                "{:?} accepted",
                case
            );
        }
    }
}

//! # PayPal OAuth
//!
//! Client-credentials exchange for a short-lived bearer token.
//! Tokens are fetched per checkout and never cached.

use crate::config::PaypalConfig;
use pay_core::{retry, PaymentError, PaymentResult, RetryPolicy};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

const TOKEN_PATH: &str = "/v1/oauth2/token";

/// Bearer token returned by `/v1/oauth2/token`
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl AccessToken {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Exchange client credentials for a bearer token.
///
/// The exchange has no side effects, so transient failures are retried
/// under `policy`.
pub async fn fetch_access_token(
    client: &Client,
    config: &PaypalConfig,
    policy: RetryPolicy,
) -> PaymentResult<AccessToken> {
    retry(policy, "paypal oauth token", || request_token(client, config)).await
}

async fn request_token(client: &Client, config: &PaypalConfig) -> PaymentResult<AccessToken> {
    let url = format!("{}{}", config.api_base_url, TOKEN_PATH);

    let response = client
        .post(&url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

    if status.is_server_error() {
        return Err(PaymentError::NetworkError(format!(
            "PayPal token endpoint returned {}",
            status
        )));
    }

    if !status.is_success() {
        error!("PayPal token error: status={}, body={}", status, body);
        return Err(PaymentError::ProviderError {
            provider: "paypal".to_string(),
            message: format!("token exchange failed with HTTP {}", status),
        });
    }

    let token: AccessToken = serde_json::from_str(&body).map_err(|e| {
        PaymentError::Serialization(format!("Failed to parse PayPal token: {}", e))
    })?;

    if token.access_token.is_empty() {
        return Err(PaymentError::ProviderError {
            provider: "paypal".to_string(),
            message: "token response has no access_token".to_string(),
        });
    }

    debug!("Obtained PayPal access token, expires_in={:?}", token.expires_in);
    Ok(token)
}

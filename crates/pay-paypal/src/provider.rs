//! # PayPal Provider
//!
//! Redirect-only provider built on the Orders v2 API:
//!
//! 1. exchange client credentials for a bearer token
//! 2. create a `CAPTURE` order carrying amount and redirect URLs
//! 3. hand back the payer approval link
//!
//! Payment intents and webhook verification are not implemented for
//! PayPal; those calls fall through to `UnsupportedOperation`.

use crate::auth::fetch_access_token;
use crate::config::PaypalConfig;
use async_trait::async_trait;
use pay_core::{
    format_major_units, Capability, CheckoutSessionResult, PaymentError, PaymentProvider,
    PaymentRequest, PaymentResult, RetryPolicy,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

const PROVIDER: &str = "paypal";
const ORDERS_PATH: &str = "/v2/checkout/orders";

/// Link relations a payer can be redirected to
pub const APPROVAL_RELS: &[&str] = &["approve", "payer-action"];

/// PayPal order-approval provider
pub struct PaypalProvider {
    config: PaypalConfig,
    client: Client,
    token_retry: RetryPolicy,
}

impl PaypalProvider {
    /// Create a new PayPal provider
    pub fn new(config: PaypalConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            client,
            token_retry: RetryPolicy::default(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(PaypalConfig::from_env()?)
    }

    /// Builder: retry policy for the token exchange
    pub fn with_token_retry(mut self, policy: RetryPolicy) -> Self {
        self.token_retry = policy;
        self
    }

    /// Orders v2 body for a single purchase unit
    fn order_body(request: &PaymentRequest) -> CreateOrderRequest<'_> {
        CreateOrderRequest {
            intent: "CAPTURE",
            payment_source: PaymentSource {
                paypal: PaypalSource {
                    experience_context: ExperienceContext {
                        payment_method_preference: "IMMEDIATE_PAYMENT_REQUIRED",
                        landing_page: "LOGIN",
                        shipping_preference: "GET_FROM_FILE",
                        user_action: "PAY_NOW",
                        return_url: &request.success_url,
                        cancel_url: &request.cancel_url,
                    },
                },
            },
            purchase_units: vec![PurchaseUnit {
                amount: Amount {
                    currency_code: request.currency.to_ascii_uppercase(),
                    value: format_major_units(request.amount, &request.currency),
                },
                custom_id: Some(request.order_id.as_str()).filter(|id| !id.is_empty()),
            }],
        }
    }

    async fn create_order(
        &self,
        bearer: &str,
        request: &PaymentRequest,
    ) -> PaymentResult<OrderResponse> {
        let url = format!("{}{}", self.config.api_base_url, ORDERS_PATH);

        let response = self
            .client
            .post(&url)
            .header("Authorization", bearer)
            .json(&Self::order_body(request))
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("PayPal API error: status={}, body={}", status, body);

            let message = serde_json::from_str::<PaypalErrorResponse>(&body)
                .map(|e| format!("{}: {}", e.name, e.message))
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse PayPal order: {}", e))
        })
    }
}

/// First link the payer must visit to approve the order
pub fn find_approval_link(links: &[LinkDescription]) -> Option<&str> {
    links
        .iter()
        .find(|link| APPROVAL_RELS.contains(&link.rel.as_str()))
        .map(|link| link.href.as_str())
}

#[async_trait]
impl PaymentProvider for PaypalProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn supports(&self, capability: Capability) -> bool {
        capability == Capability::CheckoutSession
    }

    fn signature_header(&self) -> &'static str {
        "paypal-transmission-sig"
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    async fn create_checkout_session(
        &self,
        request: &PaymentRequest,
    ) -> PaymentResult<CheckoutSessionResult> {
        let token = fetch_access_token(&self.client, &self.config, self.token_retry).await?;
        let order = self.create_order(&token.bearer(), request).await?;

        let Some(approval_url) = find_approval_link(&order.links) else {
            warn!("PayPal order {} has no approval link", order.id);
            return Err(PaymentError::MissingApprovalLink {
                provider: PROVIDER.to_string(),
                order_id: order.id,
            });
        };

        info!(
            "Created PayPal order: id={}, status={:?}",
            order.id, order.status
        );

        Ok(CheckoutSessionResult {
            id: approval_url.to_string(),
        })
    }
}

// =============================================================================
// PayPal API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    intent: &'static str,
    payment_source: PaymentSource<'a>,
    purchase_units: Vec<PurchaseUnit<'a>>,
}

#[derive(Debug, Serialize)]
struct PaymentSource<'a> {
    paypal: PaypalSource<'a>,
}

#[derive(Debug, Serialize)]
struct PaypalSource<'a> {
    experience_context: ExperienceContext<'a>,
}

#[derive(Debug, Serialize)]
struct ExperienceContext<'a> {
    payment_method_preference: &'static str,
    landing_page: &'static str,
    shipping_preference: &'static str,
    user_action: &'static str,
    return_url: &'a str,
    cancel_url: &'a str,
}

#[derive(Debug, Serialize)]
struct PurchaseUnit<'a> {
    amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Amount {
    currency_code: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    links: Vec<LinkDescription>,
}

/// HATEOAS link on an order response
#[derive(Debug, Clone, Deserialize)]
pub struct LinkDescription {
    pub href: String,
    pub rel: String,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaypalErrorResponse {
    name: String,
    message: String,
}

//! # Stripe Provider
//!
//! Checkout Sessions, PaymentIntents and signed `payment_intent.succeeded`
//! webhooks against the Stripe REST API.
//!
//! The API key lives in this provider's [`StripeConfig`] and is sent per
//! request, so several providers with different accounts can coexist.

use crate::config::StripeConfig;
use crate::webhook::{
    StripePaymentIntent, StripeWebhookEvent, WebhookVerifier, PAYMENT_SUCCEEDED_EVENT,
    SIGNATURE_HEADER,
};
use async_trait::async_trait;
use chrono::Utc;
use pay_core::{
    Capability, CheckoutSessionResult, PaymentError, PaymentIntentResult, PaymentProvider,
    PaymentRequest, PaymentResult, PaymentSuccessEvent, ORDER_ID_KEY, STORE_ID_KEY,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Product label on the single checkout line item
pub const LINE_ITEM_NAME: &str = "order-number";

const PROVIDER: &str = "stripe";

/// Stripe payment provider
pub struct StripeProvider {
    config: StripeConfig,
    client: Client,
    verifier: WebhookVerifier,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;
        let verifier = WebhookVerifier::new(&config.webhook_secret, config.webhook_tolerance);

        Ok(Self {
            config,
            client,
            verifier,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Form body for `POST /v1/checkout/sessions`
    fn checkout_form(request: &PaymentRequest) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            (
                "line_items[0][price_data][currency]".to_string(),
                request.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                request.amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                LINE_ITEM_NAME.to_string(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
        ];
        push_metadata(&mut form, "payment_intent_data[metadata]", request);
        form
    }

    /// Form body for `POST /v1/payment_intents`
    fn intent_form(request: &PaymentRequest) -> Vec<(String, String)> {
        let mut form = vec![
            ("amount".to_string(), request.amount.to_string()),
            ("currency".to_string(), request.currency.clone()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        push_metadata(&mut form, "metadata", request);
        form
    }

    /// POST a form to the Stripe API and decode the success body.
    ///
    /// Each call carries a fresh idempotency key; creation calls are never
    /// retried here.
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> PaymentResult<T> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(form)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }

    /// Verify and normalize a webhook at a given unix time
    fn parse_payment_success(
        &self,
        payload: &[u8],
        signature: &str,
        now: i64,
    ) -> PaymentResult<PaymentSuccessEvent> {
        self.verifier.verify(payload, signature, now)?;

        let event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            PaymentError::WebhookParseError(format!("Failed to parse webhook: {}", e))
        })?;

        debug!("Verified Stripe webhook: id={}, type={}", event.id, event.event_type);

        if event.event_type != PAYMENT_SUCCEEDED_EVENT {
            return Err(PaymentError::UnknownEventType {
                event_type: event.event_type,
            });
        }

        let intent: StripePaymentIntent =
            serde_json::from_value(event.data.object).map_err(|e| {
                PaymentError::WebhookParseError(format!("Failed to parse payment_intent: {}", e))
            })?;

        let order_id = intent
            .metadata
            .get(ORDER_ID_KEY)
            .cloned()
            .unwrap_or_default();

        Ok(PaymentSuccessEvent {
            id: intent.id,
            amount: intent.amount,
            currency: intent.currency,
            order_id,
        })
    }
}

fn push_metadata(form: &mut Vec<(String, String)>, prefix: &str, request: &PaymentRequest) {
    for (key, value) in [
        (ORDER_ID_KEY, &request.order_id),
        (STORE_ID_KEY, &request.store_id),
    ] {
        form.push((format!("{}[{}]", prefix, key), value.clone()));
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn supports(&self, _capability: Capability) -> bool {
        true
    }

    fn signature_header(&self) -> &'static str {
        SIGNATURE_HEADER
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    async fn create_checkout_session(
        &self,
        request: &PaymentRequest,
    ) -> PaymentResult<CheckoutSessionResult> {
        let form = Self::checkout_form(request);
        let session: StripeCheckoutSessionResponse =
            self.post_form("/v1/checkout/sessions", &form).await?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CheckoutSessionResult { id: session.id })
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    async fn create_payment_intent(
        &self,
        request: &PaymentRequest,
    ) -> PaymentResult<PaymentIntentResult> {
        let form = Self::intent_form(request);
        let intent: StripePaymentIntentResponse =
            self.post_form("/v1/payment_intents", &form).await?;

        info!("Created Stripe payment intent: id={}", intent.id);

        let client_secret = intent.client_secret.ok_or_else(|| PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("payment intent {} has no client_secret", intent.id),
        })?;

        Ok(PaymentIntentResult { client_secret })
    }

    #[instrument(skip(self, payload, signature), fields(bytes = payload.len()))]
    async fn handle_payment_success(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> PaymentResult<PaymentSuccessEvent> {
        self.parse_payment_success(payload, signature, Utc::now().timestamp())
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn provider() -> StripeProvider {
        StripeProvider::new(StripeConfig::new("sk_test_abc", "whsec_test")).unwrap()
    }

    fn sample_request() -> PaymentRequest {
        PaymentRequest::new(2000, "eur")
            .with_urls("https://x/success", "https://x/cancel")
            .with_ids("o1", "s1")
    }

    fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn signed(provider: &StripeProvider, body: &serde_json::Value) -> (Vec<u8>, String) {
        let payload = serde_json::to_vec(body).unwrap();
        let header = provider.verifier.generate_test_header(&payload, NOW);
        (payload, header)
    }

    #[test]
    fn test_checkout_form() {
        let form = StripeProvider::checkout_form(&sample_request());

        assert_eq!(form_value(&form, "mode"), Some("payment"));
        assert_eq!(form_value(&form, "line_items[0][price_data][unit_amount]"), Some("2000"));
        assert_eq!(form_value(&form, "line_items[0][price_data][currency]"), Some("eur"));
        assert_eq!(
            form_value(&form, "line_items[0][price_data][product_data][name]"),
            Some(LINE_ITEM_NAME)
        );
        assert_eq!(form_value(&form, "line_items[0][quantity]"), Some("1"));
        assert_eq!(
            form_value(&form, "payment_intent_data[metadata][order_id]"),
            Some("o1")
        );
        assert_eq!(
            form_value(&form, "payment_intent_data[metadata][store_id]"),
            Some("s1")
        );
    }

    #[test]
    fn test_intent_form() {
        let form = StripeProvider::intent_form(&sample_request());

        assert_eq!(form_value(&form, "amount"), Some("2000"));
        assert_eq!(form_value(&form, "automatic_payment_methods[enabled]"), Some("true"));
        assert_eq!(form_value(&form, "metadata[order_id]"), Some("o1"));
        assert_eq!(form_value(&form, "metadata[store_id]"), Some("s1"));
    }

    #[test]
    fn test_metadata_keys_sent_when_ids_empty() {
        let form = StripeProvider::intent_form(&PaymentRequest::new(100, "eur"));

        let keys: Vec<&str> = form
            .iter()
            .filter(|(k, _)| k.starts_with("metadata["))
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["metadata[order_id]", "metadata[store_id]"]);
        assert_eq!(form_value(&form, "metadata[order_id]"), Some(""));
    }

    #[test]
    fn test_payment_succeeded_event() {
        let provider = provider();
        let (payload, header) = signed(
            &provider,
            &json!({
                "id": "evt_1",
                "type": "payment_intent.succeeded",
                "data": { "object": {
                    "id": "pi_123",
                    "object": "payment_intent",
                    "amount": 2000,
                    "currency": "eur",
                    "metadata": { "order_id": "o1", "store_id": "s1" }
                }}
            }),
        );

        let event = provider.parse_payment_success(&payload, &header, NOW).unwrap();
        assert_eq!(
            event,
            PaymentSuccessEvent {
                id: "pi_123".into(),
                amount: 2000,
                currency: "eur".into(),
                order_id: "o1".into(),
            }
        );
    }

    #[test]
    fn test_other_event_type_is_unknown() {
        let provider = provider();
        let (payload, header) = signed(
            &provider,
            &json!({
                "id": "evt_2",
                "type": "charge.refunded",
                "data": { "object": { "id": "ch_1" } }
            }),
        );

        let err = provider.parse_payment_success(&payload, &header, NOW).unwrap_err();
        assert!(err.is_unknown_event_type());
    }

    #[test]
    fn test_bad_signature_checked_before_event_type() {
        let provider = provider();
        let payload = br#"{"id":"evt_3","type":"charge.refunded","data":{"object":{}}}"#;
        let header = format!("t={NOW},v1={}", "ab".repeat(32));

        let err = provider.parse_payment_success(payload, &header, NOW).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_signed_garbage_is_parse_error() {
        let provider = provider();
        let payload = b"not json";
        let header = provider.verifier.generate_test_header(payload, NOW);

        let err = provider.parse_payment_success(payload, &header, NOW).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookParseError(_)));
    }
}

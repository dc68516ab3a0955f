//! # Request Handlers
//!
//! Axum request handlers for the payment API.
//! Each handler decodes a `PaymentRequest`, calls one provider and
//! serializes the normalized result. No state survives the request.

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use pay_core::{BoxedPaymentProvider, PaymentRequest};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

/// Provider behind the card checkout and payment-intent routes
pub const CARD_PROVIDER: &str = "stripe";

/// Provider behind the redirect order route
pub const REDIRECT_PROVIDER: &str = "paypal";

// =============================================================================
// Response Types
// =============================================================================

/// Create checkout session response
#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    pub id: String,
}

/// Create payment intent response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// Create PayPal order response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaypalOrderResponse {
    pub approval_url: String,
}

/// Apply defaults and reject requests no provider should see
fn prepare(request: PaymentRequest) -> Result<PaymentRequest, ApiError> {
    let request = request.with_default_currency();
    request.validate()?;
    Ok(request)
}

fn require_provider<'a>(
    state: &'a AppState,
    name: &str,
) -> Result<&'a BoxedPaymentProvider, ApiError> {
    state.provider(name).ok_or_else(|| {
        error!("payment provider {} is not configured", name);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Payment provider unavailable")
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "paygate",
        "version": env!("CARGO_PKG_VERSION"),
        "providers": state.providers.providers(),
    }))
}

/// Create a hosted card checkout session
#[instrument(skip(state, request), fields(order_id = %request.order_id))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PaymentRequest>,
) -> Result<Json<CheckoutSessionResponse>, ApiError> {
    let request = prepare(request)?;
    let provider = require_provider(&state, CARD_PROVIDER)?;

    let session = state
        .call_upstream("create_checkout_session", provider.create_checkout_session(&request))
        .await
        .map_err(|e| {
            error!("creating new checkout session: {}", e);
            ApiError::from(e)
        })?;

    info!("Created checkout session: {}", session.id);

    Ok(Json(CheckoutSessionResponse { id: session.id }))
}

/// Create a payment intent for client-side confirmation
#[instrument(skip(state, request), fields(order_id = %request.order_id))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PaymentRequest>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let request = prepare(request)?;
    let provider = require_provider(&state, CARD_PROVIDER)?;

    let intent = state
        .call_upstream("create_payment_intent", provider.create_payment_intent(&request))
        .await
        .map_err(|e| {
            error!("failed to create payment intent: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Create a PayPal order and return its approval URL
#[instrument(skip(state, request), fields(order_id = %request.order_id))]
pub async fn create_paypal_order(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PaymentRequest>,
) -> Result<Json<PaypalOrderResponse>, ApiError> {
    let request = prepare(request)?;
    let provider = require_provider(&state, REDIRECT_PROVIDER)?;

    let session = state
        .call_upstream("create_paypal_order", provider.create_checkout_session(&request))
        .await
        .map_err(|e| {
            error!("failed to create PayPal order: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(PaypalOrderResponse {
        approval_url: session.id,
    }))
}

/// Verify and handle a payment-success webhook for `processor`.
///
/// Verified events of other types are acknowledged with 200 so the sender
/// stops re-delivering them. Everything else that fails is reported to the
/// sender.
#[instrument(skip(state, headers, body), fields(bytes = body.len()))]
pub async fn payment_success_webhook(
    State(state): State<AppState>,
    Path(processor): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let provider = state
        .provider(&processor)
        .ok_or_else(|| ApiError::not_found(format!("Unknown processor: {}", processor)))?;

    let signature = headers
        .get(provider.signature_header())
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let result = state
        .call_upstream("handle_payment_success", provider.handle_payment_success(&body, signature))
        .await;

    match result {
        Ok(event) => {
            state
                .events
                .on_payment_succeeded(provider.provider_name(), &event)
                .map_err(|e| {
                    error!("payment event handler failed: {}", e);
                    ApiError::from(e)
                })?;
            Ok(StatusCode::OK)
        }
        Err(e) if e.is_unknown_event_type() => {
            info!("acknowledging unhandled webhook: {}", e);
            Ok(StatusCode::OK)
        }
        Err(e) => {
            warn!("rejecting {} webhook: {}", processor, e);
            Err(ApiError::from(e))
        }
    }
}

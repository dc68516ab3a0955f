//! # Stripe Webhook Verification
//!
//! Stripe signs every webhook delivery with a `Stripe-Signature` header:
//!
//! ```text
//! Stripe-Signature: t=1700000000,v1=5257a869e7ec...,v1=...
//! ```
//!
//! `v1` is the hex HMAC-SHA256 of `"{t}.{raw body}"` keyed by the endpoint's
//! signing secret. Several `v1` entries may be present while a secret is
//! being rolled; any one matching is enough.

use hmac::{Hmac, Mac};
use pay_core::{PaymentError, PaymentResult};
use serde::Deserialize;
use sha2::Sha256;
use std::collections::HashMap;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

/// Header Stripe puts the signature in
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// The only event type that produces a `PaymentSuccessEvent`
pub const PAYMENT_SUCCEEDED_EVENT: &str = "payment_intent.succeeded";

const SIGNATURE_SCHEME: &str = "v1";

/// Verifies signed webhook payloads against one signing secret
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance: Duration,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>, tolerance: Duration) -> Self {
        Self {
            secret: secret.into(),
            tolerance,
        }
    }

    /// Verify `payload` against the header, relative to the unix time `now`.
    pub fn verify(&self, payload: &[u8], header: &str, now: i64) -> PaymentResult<()> {
        let parsed = parse_signature_header(header)?;

        // Header timestamp is untrusted; abs_diff cannot overflow
        if now.abs_diff(parsed.timestamp) > self.tolerance.as_secs() {
            return Err(PaymentError::WebhookVerificationFailed(
                "Timestamp outside tolerance".to_string(),
            ));
        }

        let valid = parsed.signatures.iter().any(|candidate| {
            hex::decode(candidate)
                .map(|bytes| {
                    self.mac(parsed.timestamp, payload)
                        .verify_slice(&bytes)
                        .is_ok()
                })
                .unwrap_or(false)
        });

        if !valid {
            return Err(PaymentError::WebhookVerificationFailed(
                "Signature mismatch".to_string(),
            ));
        }

        Ok(())
    }

    /// Hex signature Stripe would send for this payload and timestamp
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> String {
        hex::encode(self.mac(timestamp, payload).finalize().into_bytes())
    }

    /// Build a complete, valid `Stripe-Signature` header (for tests and
    /// local tooling).
    pub fn generate_test_header(&self, payload: &[u8], timestamp: i64) -> String {
        format!(
            "t={},{}={}",
            timestamp,
            SIGNATURE_SCHEME,
            self.sign(payload, timestamp)
        )
    }

    fn mac(&self, timestamp: i64, payload: &[u8]) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac
    }
}

#[derive(Debug)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> PaymentResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            SIGNATURE_SCHEME => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(PaymentError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

// =============================================================================
// Event Payloads
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct StripeWebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StripeEventData {
    pub object: serde_json::Value,
}

/// The subset of a PaymentIntent object we read
#[derive(Debug, Deserialize)]
pub(crate) struct StripePaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const NOW: i64 = 1_700_000_000;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SECRET, Duration::from_secs(300))
    }

    #[test]
    fn test_parse_signature_header() {
        let header = "t=1234567890,v1=abc123,v1=def456,v0=legacy";
        let parsed = parse_signature_header(header).unwrap();

        assert_eq!(parsed.timestamp, 1234567890);
        assert_eq!(parsed.signatures, vec!["abc123", "def456"]);
    }

    #[test]
    fn test_parse_rejects_incomplete_header() {
        assert!(parse_signature_header("").is_err());
        assert!(parse_signature_header("v1=abc").is_err());
        assert!(parse_signature_header("t=123").is_err());
        assert!(parse_signature_header("t=notanumber,v1=abc").is_err());
    }

    #[test]
    fn test_valid_signature() {
        let payload = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;
        let header = verifier().generate_test_header(payload, NOW);

        assert!(verifier().verify(payload, &header, NOW).is_ok());
    }

    #[test]
    fn test_verification_is_deterministic() {
        let payload = br#"{"id":"evt_1"}"#;
        let header = verifier().generate_test_header(payload, NOW);

        for _ in 0..3 {
            assert!(verifier().verify(payload, &header, NOW).is_ok());
            assert!(verifier().verify(b"{}", &header, NOW).is_err());
        }
    }

    #[test]
    fn test_any_modified_byte_is_rejected() {
        let payload = br#"{"id":"evt_1","amount":2000}"#.to_vec();
        let header = verifier().generate_test_header(&payload, NOW);

        for i in 0..payload.len() {
            let mut tampered = payload.clone();
            tampered[i] ^= 0x01;
            let result = verifier().verify(&tampered, &header, NOW);
            assert!(
                matches!(result, Err(PaymentError::WebhookVerificationFailed(_))),
                "byte {i} flip was accepted"
            );
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = br#"{"id":"evt_1"}"#;
        let other = WebhookVerifier::new("whsec_other", Duration::from_secs(300));
        let header = other.generate_test_header(payload, NOW);

        assert!(verifier().verify(payload, &header, NOW).is_err());
    }

    #[test]
    fn test_timestamp_tolerance() {
        let payload = br#"{"id":"evt_1"}"#;
        let stale = verifier().generate_test_header(payload, NOW - 301);
        let future = verifier().generate_test_header(payload, NOW + 301);
        let edge = verifier().generate_test_header(payload, NOW - 300);

        assert!(verifier().verify(payload, &stale, NOW).is_err());
        assert!(verifier().verify(payload, &future, NOW).is_err());
        assert!(verifier().verify(payload, &edge, NOW).is_ok());
    }

    #[test]
    fn test_extreme_timestamps_rejected() {
        let payload = br#"{"id":"evt_1"}"#;

        for timestamp in [i64::MIN, i64::MIN + NOW, i64::MAX] {
            let header = verifier().generate_test_header(payload, timestamp);
            let result = verifier().verify(payload, &header, NOW);
            assert!(
                matches!(result, Err(PaymentError::WebhookVerificationFailed(_))),
                "t={} accepted",
                timestamp
            );
        }

        let header = format!("t={},v1={}", i64::MIN, "00".repeat(32));
        assert!(verifier().verify(payload, &header, NOW).is_err());
    }

    #[test]
    fn test_rolled_secret_second_signature_matches() {
        let payload = br#"{"id":"evt_1"}"#;
        let good = verifier().sign(payload, NOW);
        let header = format!("t={NOW},v1={},v1={good}", "00".repeat(32));

        assert!(verifier().verify(payload, &header, NOW).is_ok());
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        let header = format!("t={NOW},v1=zzzz");
        assert!(verifier().verify(b"{}", &header, NOW).is_err());
    }
}

//! Webhook authentication and event parsing.
//!
//! Providers confirm payments out-of-band by POSTing a JSON event with a
//! keyed MAC over the body. Two rules keep this path safe:
//!
//! 1. The MAC is computed over the **exact raw bytes** received, never over
//!    a re-serialized form — re-serialization differences are exactly the
//!    gap a forged body hides in.
//! 2. Verification happens **before** parsing; an unauthenticated body
//!    never reaches the JSON parser.
//!
//! Comparison uses the `Mac::verify_slice` constant-time check.

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sha2::Sha256;
use trustrail_types::{constants, Result, TransactionId, TrustrailError};

type HmacSha256 = Hmac<Sha256>;

/// Authenticates inbound webhook bodies against a shared secret.
pub struct WebhookVerifier {
    secret: Vec<u8>,
}

impl WebhookVerifier {
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify the hex MAC from the signature header against the raw body.
    ///
    /// # Errors
    /// Returns `WebhookAuthFailed` on any mismatch, including a header that
    /// is not valid hex.
    pub fn verify(&self, raw_body: &[u8], signature_hex: &str) -> Result<()> {
        let claimed = hex::decode(signature_hex.trim())
            .map_err(|_| TrustrailError::WebhookAuthFailed)?;
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key size");
        mac.update(raw_body);
        mac.verify_slice(&claimed).map_err(|_| {
            tracing::warn!("webhook body failed MAC verification");
            TrustrailError::WebhookAuthFailed
        })
    }

    /// Compute the hex MAC for a body. Used by tests and by outbound
    /// delivery tooling.
    #[must_use]
    pub fn sign(&self, raw_body: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key size");
        mac.update(raw_body);
        hex::encode(mac.finalize().into_bytes())
    }
}

/// A parsed, authenticated webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// The provider confirmed a payment; triggers settlement finalization.
    PaymentConfirmed {
        /// The transaction the confirmation references.
        reference: TransactionId,
        /// Confirmed settlement amount.
        amount: Decimal,
        /// The event's raw `data` object, kept for the receipt payload.
        data: serde_json::Value,
    },
    /// Anything else. Acknowledged with no side effect so the provider
    /// does not redeliver forever.
    Unrecognized { event_type: String },
}

/// Parse an *already authenticated* raw body into an event.
///
/// # Errors
/// Returns `WebhookMalformed` when the body is not JSON, has no `type`, or
/// a confirmation is missing its reference or amount.
pub fn parse_event(raw_body: &[u8]) -> Result<WebhookEvent> {
    let value: serde_json::Value =
        serde_json::from_slice(raw_body).map_err(|e| TrustrailError::WebhookMalformed {
            reason: format!("body is not JSON: {e}"),
        })?;

    let event_type = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| TrustrailError::WebhookMalformed {
            reason: "missing event type".to_string(),
        })?;

    if event_type != constants::EVENT_PAYMENT_CONFIRMED {
        return Ok(WebhookEvent::Unrecognized {
            event_type: event_type.to_string(),
        });
    }

    let data = value
        .get("data")
        .cloned()
        .ok_or_else(|| TrustrailError::WebhookMalformed {
            reason: "confirmation has no data object".to_string(),
        })?;

    let reference = data
        .get("reference")
        .and_then(serde_json::Value::as_str)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| TrustrailError::WebhookMalformed {
            reason: "confirmation has no reference".to_string(),
        })?;

    let amount_raw = data
        .get("amount")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| TrustrailError::WebhookMalformed {
            reason: "confirmation has no amount".to_string(),
        })?;
    let amount: Decimal = amount_raw
        .parse()
        .map_err(|_| TrustrailError::WebhookMalformed {
            reason: format!("confirmation amount {amount_raw:?} is not a decimal"),
        })?;

    Ok(WebhookEvent::PaymentConfirmed {
        reference: TransactionId::from(reference),
        amount,
        data,
    })
}

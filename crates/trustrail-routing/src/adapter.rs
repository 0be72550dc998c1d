//! The generic adapter contract and the transport seam behind it.
//!
//! A [`PayoutAdapter`] owns the translation between the pipeline's generic
//! payout request and one rail's wire shape. The actual wire protocol lives
//! behind [`RailGateway`], injected at bootstrap — the adapters here only
//! build payloads and normalize outcomes.

use thiserror::Error;
use trustrail_types::{PayoutReceipt, PayoutRequest, ProviderName, Result, TrustrailError};

/// Transport seam to one payout rail. Implementations wrap the provider's
/// HTTP client / SDK; tests substitute scripted fakes.
pub trait RailGateway: Send + Sync {
    /// Submit a provider-shaped payload and return the provider's raw
    /// response. Blocking, with the implementation's own timeout.
    fn submit(
        &self,
        payload: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, GatewayFault>;
}

/// Normalized transport-level failure.
#[derive(Debug, Clone, Error)]
pub enum GatewayFault {
    /// The call exceeded the transport's timeout budget.
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The rail asked us to slow down.
    #[error("rate limited")]
    RateLimited,

    /// The rail understood and refused (invalid destination, insufficient
    /// linked funding, ...). Terminal for this presentment.
    #[error("rejected [{code}]: {message}")]
    Rejected { code: String, message: String },

    /// Connection-level failure before any rail answer.
    #[error("transport failure: {message}")]
    Transport { message: String },
}

impl GatewayFault {
    /// Whether a retry with the same idempotency key may succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::RateLimited | Self::Transport { .. } => true,
            Self::Rejected { .. } => false,
        }
    }

    /// Short machine code for the error taxonomy.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Timeout { .. } => "TIMEOUT".to_string(),
            Self::RateLimited => "RATE_LIMITED".to_string(),
            Self::Rejected { code, .. } => code.clone(),
            Self::Transport { .. } => "TRANSPORT".to_string(),
        }
    }
}

/// Map a gateway fault into the central error taxonomy for one provider.
#[must_use]
pub fn provider_failure(provider: ProviderName, fault: &GatewayFault) -> TrustrailError {
    TrustrailError::ProviderFailure {
        provider,
        code: fault.code(),
        message: fault.to_string(),
        retryable: fault.retryable(),
    }
}

// Allows sharing one gateway between an adapter and a test that inspects
// what was submitted.
impl<G: RailGateway + ?Sized> RailGateway for std::sync::Arc<G> {
    fn submit(
        &self,
        payload: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, GatewayFault> {
        (**self).submit(payload)
    }
}

/// One payout rail. `execute` must be idempotent on the provider side with
/// respect to `request.idempotency_key`.
pub trait PayoutAdapter: Send + Sync {
    /// Which rail this adapter drives.
    fn provider(&self) -> ProviderName;

    /// Dispatch the payout and normalize the response.
    ///
    /// # Errors
    /// Returns `ProviderFailure` with `retryable` set for transient faults.
    fn execute(&self, request: &PayoutRequest) -> Result<PayoutReceipt>;
}

impl std::fmt::Debug for dyn PayoutAdapter + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayoutAdapter")
            .field("provider", &self.provider())
            .finish()
    }
}

/// Pull the provider-side payment reference out of a raw response.
/// Rails disagree on nesting, so a few well-known spots are probed before
/// falling back to the idempotency key the request carried.
#[must_use]
pub fn extract_reference(payload: &serde_json::Value, request: &PayoutRequest) -> String {
    for path in [
        &["payment", "id"][..],
        &["transaction", "id"][..],
        &["data", "id"][..],
        &["id"][..],
    ] {
        let mut node = payload;
        let mut found = true;
        for key in path {
            match node.get(key) {
                Some(next) => node = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if found {
            if let Some(s) = node.as_str() {
                return s.to_string();
            }
        }
    }
    request.idempotency_key.to_string()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use trustrail_types::{Destination, IdempotencyKey, TransactionId};

    use super::*;

    fn request() -> PayoutRequest {
        PayoutRequest {
            amount: Decimal::new(10000, 2),
            currency: "USD".to_string(),
            destination: Destination::CardAccount,
            idempotency_key: IdempotencyKey::derive(&TransactionId::from("TX1")),
        }
    }

    #[test]
    fn transient_faults_are_retryable() {
        assert!(GatewayFault::Timeout { ms: 5000 }.retryable());
        assert!(GatewayFault::RateLimited.retryable());
        assert!(
            GatewayFault::Transport {
                message: "connection refused".into()
            }
            .retryable()
        );
    }

    #[test]
    fn rejections_are_terminal() {
        let fault = GatewayFault::Rejected {
            code: "INVALID_DESTINATION".into(),
            message: "no such recipient".into(),
        };
        assert!(!fault.retryable());
        assert_eq!(fault.code(), "INVALID_DESTINATION");
    }

    #[test]
    fn provider_failure_carries_retryability() {
        let err = provider_failure(ProviderName::CardNetwork, &GatewayFault::RateLimited);
        assert!(err.is_retryable());
        let err = provider_failure(
            ProviderName::CardNetwork,
            &GatewayFault::Rejected {
                code: "DECLINED".into(),
                message: "card declined".into(),
            },
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn reference_extraction_probes_known_paths() {
        let req = request();
        assert_eq!(
            extract_reference(&json!({"payment": {"id": "pay-1"}}), &req),
            "pay-1"
        );
        assert_eq!(
            extract_reference(&json!({"transaction": {"id": "txn-2"}}), &req),
            "txn-2"
        );
        assert_eq!(
            extract_reference(&json!({"data": {"id": "chg-3"}}), &req),
            "chg-3"
        );
        assert_eq!(extract_reference(&json!({"id": "flat-4"}), &req), "flat-4");
    }

    #[test]
    fn reference_falls_back_to_idempotency_key() {
        let req = request();
        assert_eq!(
            extract_reference(&json!({"status": "ok"}), &req),
            req.idempotency_key.to_string()
        );
    }
}

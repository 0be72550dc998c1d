//! Error types for the TrustRail settlement pipeline.
//!
//! All errors use the `TR_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors
//! - 2xx: Authentication errors
//! - 3xx: Trust oracle errors
//! - 4xx: Vault errors
//! - 5xx: Routing errors
//! - 6xx: Provider / payout errors
//! - 7xx: Recording / settlement errors
//! - 8xx: Webhook errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{ProviderName, TransactionId};

/// Central error enum for all TrustRail operations.
#[derive(Debug, Error)]
pub enum TrustrailError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// A required presentment field was absent from the request.
    #[error("TR_ERR_100: Missing required field: {field}")]
    MissingField { field: &'static str },

    /// The presentment failed validation (bad amount, malformed hash, etc.).
    #[error("TR_ERR_101: Invalid presentment: {reason}")]
    ValidationFailed { reason: String },

    // =================================================================
    // Authentication Errors (2xx)
    // =================================================================
    /// Signature or shared-secret token did not authenticate the submitter.
    /// One variant for every authentication failure mode so callers cannot
    /// distinguish a bad signature from a wrong identity.
    #[error("TR_ERR_200: Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    // =================================================================
    // Trust Oracle Errors (3xx)
    // =================================================================
    /// The oracle answered and rejected the trust check.
    #[error("TR_ERR_300: Trust check invalid for transaction {0}")]
    TrustCheckInvalid(TransactionId),

    /// The oracle could not be queried. Blocks payout just like a rejection.
    #[error("TR_ERR_301: Trust oracle unavailable: {reason}")]
    TrustCheckUnavailable { reason: String },

    // =================================================================
    // Vault Errors (4xx)
    // =================================================================
    /// Not enough custodial balance to reserve the payout amount.
    #[error("TR_ERR_400: Insufficient vault balance: need {needed}, have {available}")]
    InsufficientVaultBalance { needed: Decimal, available: Decimal },

    // =================================================================
    // Routing Errors (5xx)
    // =================================================================
    /// No route is configured for this intent classification.
    #[error("TR_ERR_500: Unsupported intent type: {intent}")]
    UnsupportedIntent { intent: String },

    /// A route exists but no adapter is registered for its provider.
    #[error("TR_ERR_501: No payout adapter registered for provider {0}")]
    AdapterUnavailable(ProviderName),

    // =================================================================
    // Provider / Payout Errors (6xx)
    // =================================================================
    /// The payout rail rejected or failed the dispatch. `retryable`
    /// distinguishes transient faults (rate limit, timeout) from terminal
    /// rejections (invalid destination, insufficient linked funding).
    #[error("TR_ERR_600: Provider {provider} failure [{code}]: {message} (retryable: {retryable})")]
    ProviderFailure {
        provider: ProviderName,
        code: String,
        message: String,
        retryable: bool,
    },

    // =================================================================
    // Recording / Settlement Errors (7xx)
    // =================================================================
    /// The durable ledger append failed. When this happens after a
    /// successful payout the pipeline surfaces `SettledButUnrecorded`,
    /// never this error directly.
    #[error("TR_ERR_700: Settlement recording failed: {reason}")]
    RecordingFailure { reason: String },

    /// The transaction was already settled (idempotency guard).
    #[error("TR_ERR_701: Transaction already settled: {0}")]
    AlreadySettled(TransactionId),

    /// Evidence publication failed after a durable write.
    #[error("TR_ERR_702: Evidence publication failed: {reason}")]
    EvidenceFailure { reason: String },

    // =================================================================
    // Webhook Errors (8xx)
    // =================================================================
    /// The webhook body's MAC did not verify against the shared secret.
    #[error("TR_ERR_800: Webhook authentication failed")]
    WebhookAuthFailed,

    /// The webhook body authenticated but could not be parsed.
    #[error("TR_ERR_801: Malformed webhook body: {reason}")]
    WebhookMalformed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TR_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TR_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (bad routing table, missing secret, etc.).
    #[error("TR_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk, network).
    #[error("TR_ERR_903: I/O error: {0}")]
    Io(String),
}

impl TrustrailError {
    /// Whether this failure may be retried with the same idempotency key.
    /// Only transient provider faults qualify; everything else is terminal
    /// for the current presentment.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderFailure { retryable: true, .. })
    }

    /// The HTTP status an API layer should answer with for this error.
    ///
    /// Mirrors the external interface contract: malformed input is 400,
    /// failed authentication 401, a rejected trust check or exhausted vault
    /// 403, a duplicate settlement 409, an unreachable oracle 503, and
    /// everything unexpected 500.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingField { .. }
            | Self::ValidationFailed { .. }
            | Self::UnsupportedIntent { .. }
            | Self::WebhookAuthFailed
            | Self::WebhookMalformed { .. } => 400,
            Self::AuthenticationFailed { .. } => 401,
            Self::TrustCheckInvalid(_) | Self::InsufficientVaultBalance { .. } => 403,
            Self::AlreadySettled(_) => 409,
            Self::TrustCheckUnavailable { .. } => 503,
            Self::AdapterUnavailable(_)
            | Self::ProviderFailure { .. }
            | Self::RecordingFailure { .. }
            | Self::EvidenceFailure { .. }
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Configuration(_)
            | Self::Io(_) => 500,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TrustrailError>;

// Conversion from std::io::Error
impl From<std::io::Error> for TrustrailError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = TrustrailError::TrustCheckInvalid(TransactionId::from("TX1"));
        let msg = format!("{err}");
        assert!(msg.starts_with("TR_ERR_300"), "Got: {msg}");
        assert!(msg.contains("TX1"));
    }

    #[test]
    fn insufficient_vault_balance_display() {
        let err = TrustrailError::InsufficientVaultBalance {
            needed: Decimal::new(100, 0),
            available: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("TR_ERR_400"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn retryable_only_for_transient_provider_faults() {
        let transient = TrustrailError::ProviderFailure {
            provider: ProviderName::CardNetwork,
            code: "RATE_LIMITED".into(),
            message: "too many requests".into(),
            retryable: true,
        };
        assert!(transient.is_retryable());

        let terminal = TrustrailError::ProviderFailure {
            provider: ProviderName::BankTransfer,
            code: "INVALID_DESTINATION".into(),
            message: "no such recipient".into(),
            retryable: false,
        };
        assert!(!terminal.is_retryable());

        assert!(!TrustrailError::WebhookAuthFailed.is_retryable());
    }

    #[test]
    fn http_status_mapping() {
        assert_eq!(
            TrustrailError::MissingField { field: "amount" }.http_status(),
            400
        );
        assert_eq!(
            TrustrailError::AuthenticationFailed {
                reason: "bad signature".into()
            }
            .http_status(),
            401
        );
        assert_eq!(
            TrustrailError::TrustCheckInvalid(TransactionId::from("TX1")).http_status(),
            403
        );
        assert_eq!(
            TrustrailError::InsufficientVaultBalance {
                needed: Decimal::new(100, 0),
                available: Decimal::ZERO,
            }
            .http_status(),
            403
        );
        assert_eq!(
            TrustrailError::AlreadySettled(TransactionId::from("TX1")).http_status(),
            409
        );
        assert_eq!(
            TrustrailError::TrustCheckUnavailable {
                reason: "rpc down".into()
            }
            .http_status(),
            503
        );
        assert_eq!(TrustrailError::Internal("boom".into()).http_status(), 500);
    }

    #[test]
    fn all_errors_have_tr_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(TrustrailError::MissingField { field: "signature" }),
            Box::new(TrustrailError::WebhookAuthFailed),
            Box::new(TrustrailError::UnsupportedIntent {
                intent: "LOTTERY".into(),
            }),
            Box::new(TrustrailError::Internal("test".into())),
            Box::new(TrustrailError::RecordingFailure {
                reason: "disk full".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("TR_ERR_"),
                "Error missing TR_ERR_ prefix: {msg}"
            );
        }
    }
}

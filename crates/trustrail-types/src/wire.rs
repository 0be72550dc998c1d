//! Wire DTOs for the external interfaces.
//!
//! The HTTP server embedding the pipeline is an external collaborator;
//! these types pin down the JSON it exchanges. Inbound field names follow
//! the presentment submission contract (`transactionId`, `commitmentHash`,
//! ...); outbound shapes are tagged by `status`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    parse_commitment_hash, AuthorizationProof, Identity, Presentment, ProviderName,
    RecipientInfo, SettlementSnapshot, TransactionId, TrustrailError,
};

// ---------------------------------------------------------------------------
// PresentmentRequest
// ---------------------------------------------------------------------------

/// Inbound presentment submission, exactly as received on the wire.
///
/// Every field is optional at the serde layer so a missing field surfaces
/// as a named [`TrustrailError::MissingField`] instead of an opaque
/// deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentmentRequest {
    /// Opaque unique transaction id.
    pub transaction_id: Option<String>,
    /// Positive decimal amount as a numeric string.
    pub amount: Option<String>,
    /// Hex-encoded 32-byte trust-check digest.
    pub commitment_hash: Option<String>,
    /// Intent classification, case-insensitive.
    pub intent_type: Option<String>,
    /// Address-style identity claiming authorization.
    pub submitter_identity: Option<String>,
    /// Hex-encoded ed25519 signature over the canonical signing payload.
    pub signature: Option<String>,
    /// Shared-secret bearer token for service-to-service submission.
    /// Mutually exclusive with `signature`; checked in constant time.
    pub service_token: Option<String>,
    /// Optional recipient details for rails that need them.
    pub recipient_info: Option<RecipientInfo>,
}

impl PresentmentRequest {
    /// Validate field presence and formats, producing the domain
    /// presentment plus its authorization proof.
    ///
    /// # Errors
    /// - [`TrustrailError::MissingField`] for each absent required field
    /// - [`TrustrailError::ValidationFailed`] for malformed amount or hash
    /// - [`TrustrailError::UnsupportedIntent`] for an unknown intent string
    pub fn into_presentment(self) -> crate::Result<(Presentment, AuthorizationProof)> {
        let transaction_id = self
            .transaction_id
            .filter(|s| !s.is_empty())
            .ok_or(TrustrailError::MissingField {
                field: "transactionId",
            })?;
        let amount_raw = self.amount.ok_or(TrustrailError::MissingField { field: "amount" })?;
        let hash_raw = self.commitment_hash.ok_or(TrustrailError::MissingField {
            field: "commitmentHash",
        })?;
        let intent_raw = self.intent_type.ok_or(TrustrailError::MissingField {
            field: "intentType",
        })?;
        let submitter = self.submitter_identity.ok_or(TrustrailError::MissingField {
            field: "submitterIdentity",
        })?;

        let proof = match (self.signature, self.service_token) {
            (Some(sig_hex), _) => {
                let signature =
                    hex::decode(sig_hex.strip_prefix("0x").unwrap_or(&sig_hex)).map_err(|e| {
                        TrustrailError::ValidationFailed {
                            reason: format!("signature is not valid hex: {e}"),
                        }
                    })?;
                AuthorizationProof::WalletSignature { signature }
            }
            (None, Some(token)) => AuthorizationProof::ServiceToken { token },
            (None, None) => return Err(TrustrailError::MissingField { field: "signature" }),
        };

        let amount: Decimal =
            amount_raw
                .parse()
                .map_err(|_| TrustrailError::ValidationFailed {
                    reason: format!("amount {amount_raw:?} is not a decimal number"),
                })?;
        let commitment_hash = parse_commitment_hash(&hash_raw)?;
        let intent = intent_raw.parse()?;

        Ok((
            Presentment {
                transaction_id: TransactionId::new(transaction_id),
                amount,
                commitment_hash,
                intent,
                submitter: Identity::new(submitter),
                recipient: self.recipient_info,
            },
            proof,
        ))
    }
}

// ---------------------------------------------------------------------------
// SubmissionResponse
// ---------------------------------------------------------------------------

/// Caller-facing success shapes for a presentment submission.
///
/// `SettledUnrecorded` is deliberately a *success* shape: the payout went
/// through and only the durable record is missing, so answering with a
/// failure would tell the operator money did not move when it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionResponse {
    /// Paid and durably recorded.
    #[serde(rename_all = "camelCase")]
    Success {
        transaction_id: TransactionId,
        amount: Decimal,
        provider: ProviderName,
        /// Raw provider receipt payload.
        receipt: serde_json::Value,
        settlement_snapshot: SettlementSnapshot,
        /// Public evidence link, when an evidence store is configured.
        #[serde(skip_serializing_if = "Option::is_none")]
        evidence_url: Option<String>,
    },
    /// Paid, but the durable ledger append failed. Flagged for
    /// reconciliation.
    #[serde(rename_all = "camelCase")]
    SettledUnrecorded { transaction_id: TransactionId },
}

// ---------------------------------------------------------------------------
// ErrorBody / WebhookResponse
// ---------------------------------------------------------------------------

/// Error body for failed submissions and rejected webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error with its `TR_ERR_` code.
    pub error: String,
    /// Additional context for unexpected failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&TrustrailError> for ErrorBody {
    fn from(err: &TrustrailError) -> Self {
        let details = match err {
            TrustrailError::Internal(d)
            | TrustrailError::Serialization(d)
            | TrustrailError::Io(d) => Some(d.clone()),
            _ => None,
        };
        Self {
            error: err.to_string(),
            details,
        }
    }
}

/// Acknowledgment for an authenticated webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub received: bool,
}

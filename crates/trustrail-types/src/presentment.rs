//! # Presentment — the client-submitted settlement claim
//!
//! A `Presentment` asserts that a pre-registered trust check (identified by
//! its commitment hash) authorizes paying `amount` through the rail selected
//! by `intent`. It is request-scoped: validated, authenticated, verified
//! against the trust oracle, and then discarded — only the resulting
//! [`crate::SettlementSnapshot`] survives.
//!
//! ## Security Properties
//!
//! - **Payload-bound authorization**: the signing payload commits to the
//!   transaction id, amount, and commitment hash, so a captured signature
//!   cannot be replayed against a different payload
//! - **Identity-bound**: the recovered signer must equal the claimed
//!   submitter (case-insensitive for address-style identities)
//! - **Single settlement**: `transaction_id` is globally unique per settled
//!   presentment; re-submission of a settled id is rejected, never re-paid

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{TransactionId, TrustrailError};

// ---------------------------------------------------------------------------
// IntentType
// ---------------------------------------------------------------------------

/// Classification of what the payout is for. Each intent maps to exactly
/// one payout rail in the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentType {
    /// Point-of-sale goods purchase. Routed to the card-network rail.
    Goods,
    /// Rent / housing payment. Routed to the bank-transfer rail.
    Housing,
    /// Service invoice. Routed to the stablecoin rail.
    Service,
}

impl IntentType {
    /// All known intents, in routing-table order.
    pub const ALL: [Self; 3] = [Self::Goods, Self::Housing, Self::Service];
}

impl FromStr for IntentType {
    type Err = TrustrailError;

    /// Case-insensitive parse. The raw string is preserved in the error so
    /// the caller can report exactly what was unsupported.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GOODS" => Ok(Self::Goods),
            "HOUSING" => Ok(Self::Housing),
            "SERVICE" => Ok(Self::Service),
            _ => Err(TrustrailError::UnsupportedIntent {
                intent: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Goods => write!(f, "GOODS"),
            Self::Housing => write!(f, "HOUSING"),
            Self::Service => write!(f, "SERVICE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// An address-style submitter identity (hex-encoded verifying key).
///
/// Comparison is case-insensitive: `0xAAA...` and `0xaaa...` name the same
/// key, and clients are inconsistent about checksum casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive identity equality.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// The raw key bytes, with any `0x`/`0X` prefix stripped.
    pub fn key_bytes(&self) -> crate::Result<Vec<u8>> {
        let stripped = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .unwrap_or(&self.0);
        hex::decode(stripped).map_err(|e| TrustrailError::ValidationFailed {
            reason: format!("identity is not valid hex: {e}"),
        })
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RecipientInfo
// ---------------------------------------------------------------------------

/// Optional recipient details. The bank-transfer rail needs an email to
/// address the payout; other rails ignore this entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientInfo {
    /// Destination email for bank-style rails.
    #[serde(rename = "recipientEmail", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Destination wallet address, overriding the submitter identity for
    /// the stablecoin rail.
    #[serde(rename = "recipientAddress", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

// ---------------------------------------------------------------------------
// AuthorizationProof
// ---------------------------------------------------------------------------

/// Proof that the submitter authorized *this* presentment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationProof {
    /// Ed25519 signature over [`Presentment::signing_payload`], produced by
    /// the submitter's wallet key.
    WalletSignature { signature: Vec<u8> },
    /// Static shared-secret bearer token for service-to-service calls.
    /// Compared in constant time by the verifier.
    ServiceToken { token: String },
}

// ---------------------------------------------------------------------------
// Presentment
// ---------------------------------------------------------------------------

/// A validated settlement claim, ready for the pipeline.
///
/// Construction goes through [`crate::PresentmentRequest::into_presentment`],
/// which enforces the field-level invariants (positive amount, 32-byte
/// commitment hash, known intent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentment {
    /// Client-supplied unique transaction id.
    pub transaction_id: TransactionId,
    /// Positive, fixed-point settlement amount.
    pub amount: Decimal,
    /// Digest of the pre-registered trust check.
    pub commitment_hash: [u8; 32],
    /// Intent classification selecting the payout rail.
    pub intent: IntentType,
    /// The identity claiming authorization.
    pub submitter: Identity,
    /// Optional recipient details for rails that need them.
    pub recipient: Option<RecipientInfo>,
}

impl Presentment {
    /// Canonical signing payload for authorization verification.
    ///
    /// Format: `"trustrail:presentment:v1:" || transaction_id || amount || commitment_hash || submitter`
    ///
    /// Committing to all four fields means a signature authorizes exactly
    /// one (transaction, amount, trust check, identity) tuple and nothing
    /// else.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(128);
        payload.extend_from_slice(b"trustrail:presentment:v1:");
        payload.extend_from_slice(self.transaction_id.as_str().as_bytes());
        payload.extend_from_slice(self.amount.to_string().as_bytes());
        payload.extend_from_slice(&self.commitment_hash);
        payload.extend_from_slice(self.submitter.as_str().to_ascii_lowercase().as_bytes());
        payload
    }

    /// The commitment hash as a `0x`-prefixed hex string.
    #[must_use]
    pub fn commitment_hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.commitment_hash))
    }
}

/// Parse a commitment hash from its wire form (hex, optional `0x` prefix,
/// exactly 32 bytes).
pub fn parse_commitment_hash(raw: &str) -> crate::Result<[u8; 32]> {
    let stripped = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(stripped).map_err(|e| TrustrailError::ValidationFailed {
        reason: format!("commitment hash is not valid hex: {e}"),
    })?;
    bytes
        .try_into()
        .map_err(|_| TrustrailError::ValidationFailed {
            reason: "commitment hash must be exactly 32 bytes".to_string(),
        })
}

/// Dummy presentment for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Presentment {
    /// Create a dummy presentment for unit tests.
    pub fn dummy(transaction_id: &str, amount: Decimal, intent: IntentType) -> Self {
        Self {
            transaction_id: TransactionId::from(transaction_id),
            amount,
            commitment_hash: [0xab; 32],
            intent,
            submitter: Identity::new("0xaaa"),
            recipient: None,
        }
    }
}

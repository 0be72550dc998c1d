//! Payout types — the generic request/receipt contract every rail adapter
//! implements.
//!
//! Adapters translate a [`PayoutRequest`] into their rail's wire shape and
//! normalize whatever comes back into a [`PayoutReceipt`]. The pipeline
//! never sees provider-specific fields outside the opaque receipt payload.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::IdempotencyKey;

// ---------------------------------------------------------------------------
// ProviderName
// ---------------------------------------------------------------------------

/// The payout rails TrustRail can dispatch through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderName {
    /// Card-network processor (point-of-sale payments API).
    CardNetwork,
    /// ACH / bank transfer rail.
    BankTransfer,
    /// Stablecoin / crypto settlement rail.
    Stablecoin,
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CardNetwork => write!(f, "card_network"),
            Self::BankTransfer => write!(f, "bank_transfer"),
            Self::Stablecoin => write!(f, "stablecoin"),
        }
    }
}

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// Where the payout lands. Each rail accepts exactly one destination form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// The card rail pays against the trust-check source account; there is
    /// no per-payout destination to address.
    CardAccount,
    /// Bank rails address the recipient by email.
    BankRecipient { email: String },
    /// Stablecoin rails address a wallet.
    WalletAddress { address: String },
}

// ---------------------------------------------------------------------------
// PayoutRequest
// ---------------------------------------------------------------------------

/// Generic payout instruction handed to the selected adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRequest {
    /// Amount to move, after the route's fee multiplier is applied.
    pub amount: Decimal,
    /// ISO currency code (e.g., "USD").
    pub currency: String,
    /// Where the funds go.
    pub destination: Destination,
    /// Deterministic key; the provider collapses duplicates carrying it.
    pub idempotency_key: IdempotencyKey,
}

// ---------------------------------------------------------------------------
// PayoutReceipt
// ---------------------------------------------------------------------------

/// Normalized proof that a rail accepted the payout.
///
/// `payload` is the provider's raw success response, kept opaque for the
/// settlement snapshot's receipt hash; `reference` is the provider-side
/// identifier extracted from it so webhooks can correlate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutReceipt {
    /// Which rail produced this receipt.
    pub provider: ProviderName,
    /// Provider-side payment reference.
    pub reference: String,
    /// Raw provider response payload.
    pub payload: serde_json::Value,
    /// When the rail acknowledged the payout.
    pub received_at: DateTime<Utc>,
}

impl PayoutReceipt {
    /// SHA-256 over the canonical receipt bytes. This is the hash recorded
    /// in the settlement snapshot, so it must be stable across re-serialization.
    ///
    /// Format: `"trustrail:receipt:v1:" || provider || reference || payload-json`
    #[must_use]
    pub fn receipt_hash(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"trustrail:receipt:v1:");
        hasher.update(self.provider.to_string().as_bytes());
        hasher.update(self.reference.as_bytes());
        // serde_json's default map is ordered, so this is deterministic for
        // a given payload value.
        hasher.update(self.payload.to_string().as_bytes());
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

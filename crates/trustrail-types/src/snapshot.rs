//! Settlement snapshot — the durable, content-addressed record of a payout.
//!
//! Created exactly once per successfully paid presentment, appended to the
//! ledger before the caller is answered, and never mutated afterwards. The
//! snapshot's `content_hash` doubles as its evidence-store address.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PayoutReceipt, ProviderName, SnapshotId, TransactionId};

/// How the snapshot came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementSource {
    /// Recorded synchronously at presentment time.
    Presentment,
    /// Recorded by the asynchronous webhook confirmation path.
    WebhookConfirmation,
}

impl std::fmt::Display for SettlementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Presentment => write!(f, "PRESENTMENT"),
            Self::WebhookConfirmation => write!(f, "WEBHOOK_CONFIRMATION"),
        }
    }
}

/// Immutable record of one completed payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSnapshot {
    /// Unique, time-ordered snapshot id.
    pub snapshot_id: SnapshotId,
    /// The settled transaction.
    pub transaction_id: TransactionId,
    /// Amount actually dispatched to the rail.
    pub amount: Decimal,
    /// ISO currency code.
    pub currency: String,
    /// The rail the payout went through.
    pub provider: ProviderName,
    /// SHA-256 of the normalized provider receipt, hex-encoded.
    pub receipt_hash: String,
    /// Custodial vault balance immediately after the reservation.
    pub vault_balance_after: Decimal,
    /// Whether the synchronous or the webhook path produced this record.
    pub source: SettlementSource,
    /// When the snapshot was assembled.
    pub recorded_at: DateTime<Utc>,
}

impl SettlementSnapshot {
    /// Assemble a snapshot from a payout receipt.
    #[must_use]
    pub fn from_receipt(
        transaction_id: TransactionId,
        amount: Decimal,
        currency: impl Into<String>,
        receipt: &PayoutReceipt,
        vault_balance_after: Decimal,
        source: SettlementSource,
    ) -> Self {
        Self {
            snapshot_id: SnapshotId::new(),
            transaction_id,
            amount,
            currency: currency.into(),
            provider: receipt.provider,
            receipt_hash: hex::encode(receipt.receipt_hash()),
            vault_balance_after,
            source,
            recorded_at: Utc::now(),
        }
    }

    /// SHA-256 over the canonical snapshot bytes.
    ///
    /// This hash commits to every field except `snapshot_id` and
    /// `recorded_at` — two independently assembled records of the same
    /// payout address the same content.
    ///
    /// Format: `"trustrail:snapshot:v1:" || transaction_id || amount || currency || provider || receipt_hash || vault_balance_after || source`
    #[must_use]
    pub fn content_hash(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"trustrail:snapshot:v1:");
        hasher.update(self.transaction_id.as_str().as_bytes());
        hasher.update(self.amount.to_string().as_bytes());
        hasher.update(self.currency.as_bytes());
        hasher.update(self.provider.to_string().as_bytes());
        hasher.update(self.receipt_hash.as_bytes());
        hasher.update(self.vault_balance_after.to_string().as_bytes());
        hasher.update(self.source.to_string().as_bytes());
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Hex form of [`Self::content_hash`], used as the content address.
    #[must_use]
    pub fn content_hash_hex(&self) -> String {
        hex::encode(self.content_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_receipt() -> PayoutReceipt {
        PayoutReceipt {
            provider: ProviderName::CardNetwork,
            reference: "pay-42".to_string(),
            payload: json!({"payment": {"id": "pay-42"}}),
            received_at: Utc::now(),
        }
    }

    fn make_snapshot() -> SettlementSnapshot {
        SettlementSnapshot::from_receipt(
            TransactionId::from("TX1"),
            Decimal::new(10000, 2),
            "USD",
            &make_receipt(),
            Decimal::new(90000, 2),
            SettlementSource::Presentment,
        )
    }

    #[test]
    fn snapshot_captures_receipt_hash() {
        let receipt = make_receipt();
        let snap = make_snapshot();
        assert_eq!(snap.receipt_hash, hex::encode(receipt.receipt_hash()));
        assert_eq!(snap.provider, ProviderName::CardNetwork);
    }

    #[test]
    fn content_hash_deterministic() {
        let snap = make_snapshot();
        assert_eq!(snap.content_hash(), snap.content_hash());
    }

    #[test]
    fn content_hash_independent_of_snapshot_id() {
        // Two assemblies of the same payout address the same content.
        let a = make_snapshot();
        let b = make_snapshot();
        assert_ne!(a.snapshot_id, b.snapshot_id);
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn content_hash_binds_amount() {
        let a = make_snapshot();
        let mut b = make_snapshot();
        b.amount = Decimal::new(20000, 2);
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn content_hash_binds_source() {
        let a = make_snapshot();
        let mut b = make_snapshot();
        b.source = SettlementSource::WebhookConfirmation;
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn serde_uses_camel_case_wire_names() {
        let snap = make_snapshot();
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json.get("transactionId").is_some());
        assert!(json.get("vaultBalanceAfter").is_some());
        assert!(json.get("receiptHash").is_some());
        assert!(json.get("transaction_id").is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let snap = make_snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: SettlementSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }
}

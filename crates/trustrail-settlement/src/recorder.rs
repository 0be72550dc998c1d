//! Settlement recorder — the single idempotent `record_settlement` path.
//!
//! Both the synchronous pipeline and the webhook confirmation path create
//! snapshots through this recorder, so the ordering invariant lives in
//! exactly one place:
//! 1. Check the durable ledger (a transaction records at most once)
//! 2. Append durably — this must succeed before the caller is acknowledged
//! 3. Publish to the evidence store, when one is configured
//!
//! A ledger failure here is the origin of the pipeline's
//! `SettledButUnrecorded` outcome; evidence failure after a durable append
//! is only a warning.

use trustrail_types::{ContentId, Result, SettlementSnapshot, TransactionId, TrustrailError};

use crate::evidence::EvidenceStore;
use crate::ledger::LedgerStore;

/// A snapshot that made it into the durable ledger, plus the evidence
/// address when publication succeeded.
#[derive(Debug, Clone)]
pub struct RecordedSettlement {
    pub snapshot: SettlementSnapshot,
    pub content_id: Option<ContentId>,
}

/// Outcome of an idempotent recording attempt.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    /// The snapshot was appended now.
    Recorded(RecordedSettlement),
    /// A snapshot for this transaction already existed; nothing was written.
    AlreadyRecorded,
}

/// Records settlements durably and publishes evidence.
pub struct SettlementRecorder {
    ledger: Box<dyn LedgerStore>,
    evidence: Option<Box<dyn EvidenceStore>>,
}

impl SettlementRecorder {
    #[must_use]
    pub fn new(ledger: Box<dyn LedgerStore>, evidence: Option<Box<dyn EvidenceStore>>) -> Self {
        Self { ledger, evidence }
    }

    /// Whether a snapshot for this transaction was ever durably recorded.
    ///
    /// # Errors
    /// Returns `RecordingFailure` if the ledger cannot be read.
    pub fn is_recorded(&self, transaction_id: &TransactionId) -> Result<bool> {
        self.ledger
            .contains(transaction_id)
            .map_err(|fault| TrustrailError::RecordingFailure {
                reason: fault.reason,
            })
    }

    /// Idempotently record one settlement snapshot.
    ///
    /// # Errors
    /// Returns `RecordingFailure` when the durable append fails. The caller
    /// decides what that means: after a payout it becomes the
    /// `SettledButUnrecorded` outcome, on the webhook path it becomes a
    /// retryable 5xx.
    pub fn record_settlement(&self, snapshot: SettlementSnapshot) -> Result<RecordOutcome> {
        if self.is_recorded(&snapshot.transaction_id)? {
            tracing::debug!(
                transaction_id = %snapshot.transaction_id,
                "settlement already recorded, skipping"
            );
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        self.ledger
            .append(&snapshot)
            .map_err(|fault| TrustrailError::RecordingFailure {
                reason: fault.reason,
            })?;

        let content_id = self.publish_evidence(&snapshot);

        tracing::info!(
            transaction_id = %snapshot.transaction_id,
            provider = %snapshot.provider,
            amount = %snapshot.amount,
            "settlement recorded"
        );

        Ok(RecordOutcome::Recorded(RecordedSettlement {
            snapshot,
            content_id,
        }))
    }

    /// Best-effort evidence publication. The ledger append already made the
    /// settlement durable; a publication fault must not fail the caller.
    fn publish_evidence(&self, snapshot: &SettlementSnapshot) -> Option<ContentId> {
        let store = self.evidence.as_ref()?;
        match store.publish(snapshot) {
            Ok(content_id) => Some(content_id),
            Err(fault) => {
                tracing::warn!(
                    transaction_id = %snapshot.transaction_id,
                    "evidence publication failed: {fault}"
                );
                None
            }
        }
    }
}

//! Durable ledger store — the append-only snapshot collaborator.
//!
//! The real store (database, chain contract, WAL) lives outside this
//! workspace; the trait pins down the contract the recorder depends on:
//! append must be durable before it returns, and `contains` must see every
//! previous successful append.

use std::collections::HashSet;
use std::sync::Mutex;

use thiserror::Error;
use trustrail_types::{SettlementSnapshot, TransactionId};

/// Failure inside a storage collaborator.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct StoreFault {
    pub reason: String,
}

impl StoreFault {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Append-only, durable settlement ledger.
pub trait LedgerStore: Send + Sync {
    /// Durably append one snapshot. Must not return `Ok` before the write
    /// is safe.
    fn append(&self, snapshot: &SettlementSnapshot) -> std::result::Result<(), StoreFault>;

    /// Whether a snapshot for this transaction was ever appended.
    fn contains(&self, transaction_id: &TransactionId) -> std::result::Result<bool, StoreFault>;
}

// Allows the embedding service to keep its own handle on the store it
// hands the recorder.
impl<L: LedgerStore + ?Sized> LedgerStore for std::sync::Arc<L> {
    fn append(&self, snapshot: &SettlementSnapshot) -> std::result::Result<(), StoreFault> {
        (**self).append(snapshot)
    }

    fn contains(&self, transaction_id: &TransactionId) -> std::result::Result<bool, StoreFault> {
        (**self).contains(transaction_id)
    }
}

/// In-memory reference ledger for tests and single-process deployments.
pub struct InMemoryLedger {
    inner: Mutex<LedgerInner>,
}

struct LedgerInner {
    snapshots: Vec<SettlementSnapshot>,
    index: HashSet<TransactionId>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerInner {
                snapshots: Vec::new(),
                index: HashSet::new(),
            }),
        }
    }

    /// All appended snapshots, in append order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<SettlementSnapshot> {
        self.inner
            .lock()
            .expect("ledger mutex poisoned")
            .snapshots
            .clone()
    }

    /// Number of appended snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("ledger mutex poisoned")
            .snapshots
            .len()
    }

    /// Whether nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transaction ids of everything appended, for registry hydration.
    #[must_use]
    pub fn transaction_ids(&self) -> Vec<TransactionId> {
        self.inner
            .lock()
            .expect("ledger mutex poisoned")
            .index
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedger {
    fn append(&self, snapshot: &SettlementSnapshot) -> std::result::Result<(), StoreFault> {
        let mut inner = self.inner.lock().expect("ledger mutex poisoned");
        inner.index.insert(snapshot.transaction_id.clone());
        inner.snapshots.push(snapshot.clone());
        Ok(())
    }

    fn contains(&self, transaction_id: &TransactionId) -> std::result::Result<bool, StoreFault> {
        Ok(self
            .inner
            .lock()
            .expect("ledger mutex poisoned")
            .index
            .contains(transaction_id))
    }
}

//! Settled-transaction registry — the never-pay-twice set.
//!
//! Each transaction id can settle exactly once. The registry is marked the
//! instant a dispatch succeeds — before durable recording — so a
//! presentment whose ledger append later fails still can never be re-paid
//! by re-submission.
//!
//! Unlike epoch-scoped dedup caches, this set never evicts: a settled id
//! stays settled for the life of the process, and is re-hydrated from the
//! durable ledger at bootstrap.

use std::collections::HashSet;
use std::sync::Mutex;

use trustrail_types::{constants, Result, TransactionId, TrustrailError};

/// Prevents double-settlement of the same transaction.
pub struct SettledRegistry {
    settled: Mutex<HashSet<TransactionId>>,
}

impl SettledRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settled: Mutex::new(HashSet::with_capacity(
                constants::SETTLED_REGISTRY_CAPACITY,
            )),
        }
    }

    /// Seed the registry from previously recorded transaction ids
    /// (ledger replay at bootstrap).
    pub fn hydrate(&self, ids: impl IntoIterator<Item = TransactionId>) {
        let mut settled = self.settled.lock().expect("registry mutex poisoned");
        settled.extend(ids);
    }

    /// Mark a transaction as settled.
    ///
    /// # Errors
    /// Returns [`TrustrailError::AlreadySettled`] if the id was already
    /// marked — the caller must treat this as "do not pay".
    pub fn mark_settled(&self, transaction_id: &TransactionId) -> Result<()> {
        let mut settled = self.settled.lock().expect("registry mutex poisoned");
        if !settled.insert(transaction_id.clone()) {
            return Err(TrustrailError::AlreadySettled(transaction_id.clone()));
        }
        Ok(())
    }

    /// Check whether a transaction has already settled.
    #[must_use]
    pub fn is_settled(&self, transaction_id: &TransactionId) -> bool {
        self.settled
            .lock()
            .expect("registry mutex poisoned")
            .contains(transaction_id)
    }

    /// Number of settled transactions tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settled.lock().expect("registry mutex poisoned").len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settled
            .lock()
            .expect("registry mutex poisoned")
            .is_empty()
    }
}

impl Default for SettledRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Evidence store — content-addressed public settlement evidence.
//!
//! Publication is optional and best-effort: the durable ledger append is
//! the source of truth, the evidence store is the independently verifiable
//! mirror. The content id of a snapshot is its canonical hash, so anyone
//! holding the snapshot can re-derive the address and audit the record.

use std::collections::HashMap;
use std::sync::Mutex;

use trustrail_types::{ContentId, SettlementSnapshot};

use crate::ledger::StoreFault;

/// Content-addressed evidence publication collaborator.
pub trait EvidenceStore: Send + Sync {
    /// Publish a snapshot and return the content id it is retrievable under.
    fn publish(&self, snapshot: &SettlementSnapshot)
        -> std::result::Result<ContentId, StoreFault>;
}

impl<E: EvidenceStore + ?Sized> EvidenceStore for std::sync::Arc<E> {
    fn publish(
        &self,
        snapshot: &SettlementSnapshot,
    ) -> std::result::Result<ContentId, StoreFault> {
        (**self).publish(snapshot)
    }
}

/// Build the caller-facing evidence URL for a published snapshot.
#[must_use]
pub fn evidence_url(base: &str, content_id: &ContentId) -> String {
    format!("{}/{}", base.trim_end_matches('/'), content_id)
}

/// In-memory reference store addressing snapshots by their canonical hash.
pub struct InMemoryEvidenceStore {
    published: Mutex<HashMap<String, SettlementSnapshot>>,
}

impl InMemoryEvidenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            published: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a published snapshot by content id.
    #[must_use]
    pub fn get(&self, content_id: &ContentId) -> Option<SettlementSnapshot> {
        self.published
            .lock()
            .expect("evidence mutex poisoned")
            .get(content_id.as_str())
            .cloned()
    }

    /// Number of published snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.lock().expect("evidence mutex poisoned").len()
    }

    /// Whether nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryEvidenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceStore for InMemoryEvidenceStore {
    fn publish(
        &self,
        snapshot: &SettlementSnapshot,
    ) -> std::result::Result<ContentId, StoreFault> {
        let content_id = snapshot.content_hash_hex();
        self.published
            .lock()
            .expect("evidence mutex poisoned")
            .insert(content_id.clone(), snapshot.clone());
        Ok(ContentId::new(content_id))
    }
}

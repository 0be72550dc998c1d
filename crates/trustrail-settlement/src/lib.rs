//! # trustrail-settlement
//!
//! **Finality Plane**: everything after money has moved.
//!
//! ## Architecture
//!
//! 1. **SettledRegistry**: the never-pay-twice set of settled transaction ids
//! 2. **LedgerStore**: durable, append-only snapshot storage (collaborator)
//! 3. **EvidenceStore**: content-addressed public evidence (collaborator)
//! 4. **SettlementRecorder**: idempotent `record_settlement` — durable
//!    append first, evidence publication second
//! 5. **WebhookVerifier**: raw-body HMAC authentication for asynchronous
//!    provider confirmations
//!
//! The synchronous pipeline and the webhook confirmation path both funnel
//! through [`SettlementRecorder::record_settlement`]; there is exactly one
//! code path that can create a snapshot.

pub mod evidence;
pub mod ledger;
pub mod recorder;
pub mod registry;
pub mod webhook;

pub use evidence::{evidence_url, EvidenceStore, InMemoryEvidenceStore};
pub use ledger::{InMemoryLedger, LedgerStore, StoreFault};
pub use recorder::{RecordOutcome, RecordedSettlement, SettlementRecorder};
pub use registry::SettledRegistry;
pub use webhook::{parse_event, WebhookEvent, WebhookVerifier};

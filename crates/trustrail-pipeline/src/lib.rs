//! # trustrail-pipeline
//!
//! The **Pipeline Orchestrator**: sequences the admission, dispatch, and
//! finality planes for each presentment and produces the caller-facing
//! result.
//!
//! ## Pipeline
//!
//! ```text
//! PresentmentRequest
//!   → validate → authenticate → verify trust (fresh) → resolve route
//!   → reserve vault funds (atomic) → dispatch payout (bounded retry)
//!   → record settlement (durable, then evidence)
//!   → SubmissionResponse
//! ```
//!
//! A second, independent entry point handles asynchronous provider
//! confirmations ([`SettlementPipeline::confirm`]); both paths funnel into
//! the same idempotent settlement recorder.
//!
//! ## Invariants
//!
//! - **Verify fresh, pay once**: the trust oracle is queried inside every
//!   paying request; a settled transaction id never pays again
//! - **Fail closed**: every pre-reservation error is terminal and
//!   side-effect-free
//! - **Durability precedes acknowledgment**: a success response means the
//!   snapshot is in the ledger; a paid-but-unrecorded payout is answered
//!   with the distinguished `settled_unrecorded` status

pub mod orchestrator;
pub mod response;
pub mod state;

pub use orchestrator::{Collaborators, SettlementPipeline};
pub use response::{submission_reply, webhook_reply};
pub use state::PipelineState;

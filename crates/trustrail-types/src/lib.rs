//! # trustrail-types
//!
//! Shared types, errors, and configuration for the **TrustRail** presentment
//! settlement pipeline.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`TransactionId`], [`SnapshotId`], [`IdempotencyKey`], [`ContentId`]
//! - **Presentment model**: [`Presentment`], [`IntentType`], [`Identity`], [`AuthorizationProof`]
//! - **Payout model**: [`ProviderName`], [`Destination`], [`PayoutRequest`], [`PayoutReceipt`]
//! - **Settlement model**: [`SettlementSnapshot`], [`SettlementSource`]
//! - **Wire DTOs**: [`PresentmentRequest`], [`SubmissionResponse`], [`WebhookResponse`]
//! - **Configuration**: [`PipelineConfig`], [`RoutingConfig`], [`RetryConfig`]
//! - **Errors**: [`TrustrailError`] with `TR_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod payout;
pub mod presentment;
pub mod snapshot;
pub mod wire;

// Re-export all primary types at crate root for ergonomic imports:
//   use trustrail_types::{Presentment, IntentType, SettlementSnapshot, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use payout::*;
pub use presentment::*;
pub use snapshot::*;
pub use wire::*;

// Constants are accessed via `trustrail_types::constants::FOO`
// (not re-exported to avoid name collisions).

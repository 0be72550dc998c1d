//! # Pipeline state machine
//!
//! Every presentment walks a strictly forward path:
//!
//! ```text
//!   RECEIVED → AUTHENTICATED → TRUST_VERIFIED → FUNDS_RESERVED
//!       → PAYOUT_DISPATCHED → RECORDED
//!                           ↘ SETTLED_UNRECORDED
//! ```
//!
//! `REJECTED` is reachable only before `FUNDS_RESERVED` — a rejection is
//! always side-effect-free. Once funds are reserved the only exits are
//! `RECORDED`, `SETTLED_UNRECORDED`, or `FAILED` (reserved-but-unpaid,
//! surfaced for reconciliation — never silently dropped). No state is ever
//! re-entered.

use serde::{Deserialize, Serialize};

/// Lifecycle state of one presentment in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineState {
    /// Parsed off the wire; nothing checked yet.
    Received,
    /// Authorization proof verified against the payload.
    Authenticated,
    /// Trust oracle freshly confirmed the commitment.
    TrustVerified,
    /// Vault balance atomically decremented. Point of no silent return.
    FundsReserved,
    /// The payout rail accepted the dispatch.
    PayoutDispatched,
    /// Snapshot durably recorded. Terminal success.
    Recorded,
    /// Paid, but the durable record failed. Terminal, flagged for
    /// reconciliation.
    SettledUnrecorded,
    /// Rejected before any funds moved. Terminal, side-effect-free.
    Rejected,
    /// Failed after funds were reserved. Terminal; the vault deficit is a
    /// known quantity for reconciliation.
    Failed,
}

impl PipelineState {
    /// Can this state transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Received, Self::Authenticated | Self::Rejected)
                | (Self::Authenticated, Self::TrustVerified | Self::Rejected)
                | (Self::TrustVerified, Self::FundsReserved | Self::Rejected)
                | (Self::FundsReserved, Self::PayoutDispatched | Self::Failed)
                | (
                    Self::PayoutDispatched,
                    Self::Recorded | Self::SettledUnrecorded
                )
        )
    }

    /// Whether this state ends the pipeline.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Recorded | Self::SettledUnrecorded | Self::Rejected | Self::Failed
        )
    }

    /// Whether funds were already reserved when this state was reached.
    /// Errors past this point must never be reported as simple rejections.
    #[must_use]
    pub fn funds_reserved(&self) -> bool {
        matches!(
            self,
            Self::FundsReserved
                | Self::PayoutDispatched
                | Self::Recorded
                | Self::SettledUnrecorded
                | Self::Failed
        )
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Received => write!(f, "RECEIVED"),
            Self::Authenticated => write!(f, "AUTHENTICATED"),
            Self::TrustVerified => write!(f, "TRUST_VERIFIED"),
            Self::FundsReserved => write!(f, "FUNDS_RESERVED"),
            Self::PayoutDispatched => write!(f, "PAYOUT_DISPATCHED"),
            Self::Recorded => write!(f, "RECORDED"),
            Self::SettledUnrecorded => write!(f, "SETTLED_UNRECORDED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

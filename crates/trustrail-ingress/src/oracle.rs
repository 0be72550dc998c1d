//! Trust oracle client — the authoritative verify-before-pay check.
//!
//! The oracle is the external source of truth for whether a
//! `(transaction id, amount, commitment hash)` triple names a valid,
//! unconsumed trust check. TrustRail holds it behind a trait so the
//! on-chain (or otherwise remote) implementation is injected at bootstrap.
//!
//! The gate deliberately owns no cache: "verify fresh, pay once" means the
//! query runs inside every submission that could move money, and a result
//! from an earlier request is never reused.

use rust_decimal::Decimal;
use thiserror::Error;
use trustrail_types::{Presentment, Result, TransactionId, TrustrailError};

/// Failure to obtain an answer from the oracle. Distinct from a negative
/// answer: a fault blocks payout with `TrustCheckUnavailable`, a negative
/// answer with `TrustCheckInvalid`.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct OracleFault {
    pub reason: String,
}

impl OracleFault {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Read-only client for the authoritative trust-check verifier.
pub trait TrustOracle: Send + Sync {
    /// Ask whether the triple names a valid, unconsumed trust check.
    /// Blocking; issued synchronously within the paying request.
    fn verify(
        &self,
        transaction_id: &TransactionId,
        amount: Decimal,
        commitment_hash: &[u8; 32],
    ) -> std::result::Result<bool, OracleFault>;
}

// Allows the embedding service to keep its own handle on the oracle client
// it hands the pipeline.
impl<T: TrustOracle + ?Sized> TrustOracle for std::sync::Arc<T> {
    fn verify(
        &self,
        transaction_id: &TransactionId,
        amount: Decimal,
        commitment_hash: &[u8; 32],
    ) -> std::result::Result<bool, OracleFault> {
        (**self).verify(transaction_id, amount, commitment_hash)
    }
}

/// Fail-closed wrapper around a [`TrustOracle`].
pub struct OracleGate {
    oracle: Box<dyn TrustOracle>,
}

impl OracleGate {
    #[must_use]
    pub fn new(oracle: Box<dyn TrustOracle>) -> Self {
        Self { oracle }
    }

    /// Verify the presentment's trust check, freshly, and fail closed.
    ///
    /// # Errors
    /// - `TrustCheckInvalid` if the oracle answers `false`
    /// - `TrustCheckUnavailable` if the oracle cannot be queried
    pub fn require_valid(&self, presentment: &Presentment) -> Result<()> {
        let valid = self
            .oracle
            .verify(
                &presentment.transaction_id,
                presentment.amount,
                &presentment.commitment_hash,
            )
            .map_err(|fault| {
                tracing::warn!(
                    transaction_id = %presentment.transaction_id,
                    "trust oracle unreachable: {fault}"
                );
                TrustrailError::TrustCheckUnavailable {
                    reason: fault.reason,
                }
            })?;

        if valid {
            Ok(())
        } else {
            Err(TrustrailError::TrustCheckInvalid(
                presentment.transaction_id.clone(),
            ))
        }
    }
}

//! Vault guard — atomic reservation of custodial balance.
//!
//! The vault is the custodial pool of offsetting units that backs payouts.
//! All mutation goes through [`VaultGuard::reserve`], a single
//! compare-and-decrement critical section, so two concurrent presentments
//! can never both pass the sufficiency check against a stale balance.
//!
//! A reservation is not undone when a later dispatch fails: the deficit is
//! a known quantity for external reconciliation, never a phantom debit.

use std::sync::Mutex;

use rust_decimal::Decimal;
use trustrail_types::{Result, TrustrailError};

/// Serialized access to the custodial vault balance.
#[derive(Debug)]
pub struct VaultGuard {
    balance: Mutex<Decimal>,
}

impl VaultGuard {
    /// Create a guard over an initial balance.
    ///
    /// # Errors
    /// Returns `Configuration` if the initial balance is negative.
    pub fn new(initial: Decimal) -> Result<Self> {
        if initial.is_sign_negative() {
            return Err(TrustrailError::Configuration(format!(
                "vault balance cannot start negative: {initial}"
            )));
        }
        Ok(Self {
            balance: Mutex::new(initial),
        })
    }

    /// Current balance. Only a point-in-time read; never use it to decide
    /// a reservation — that is what [`Self::reserve`] is for.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        *self.balance.lock().expect("vault mutex poisoned")
    }

    /// Credit the vault (funding / top-up).
    pub fn deposit(&self, amount: Decimal) {
        let mut balance = self.balance.lock().expect("vault mutex poisoned");
        *balance += amount;
    }

    /// Atomically reserve `amount`: check sufficiency and decrement in one
    /// critical section. Returns the balance after the reservation.
    ///
    /// # Errors
    /// Returns `InsufficientVaultBalance` — with no mutation — if the
    /// balance cannot cover the amount.
    pub fn reserve(&self, amount: Decimal) -> Result<Decimal> {
        if amount.is_zero() || amount.is_sign_negative() {
            return Err(TrustrailError::Internal(format!(
                "reserve called with non-positive amount {amount}"
            )));
        }

        let mut balance = self.balance.lock().expect("vault mutex poisoned");
        if *balance < amount {
            return Err(TrustrailError::InsufficientVaultBalance {
                needed: amount,
                available: *balance,
            });
        }

        *balance -= amount;
        tracing::debug!(%amount, balance_after = %*balance, "vault reservation");
        Ok(*balance)
    }
}

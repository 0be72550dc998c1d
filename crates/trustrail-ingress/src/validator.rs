//! Presentment validator — hard gate for admission.
//!
//! Validates every presentment before authentication or any collaborator
//! call. Enforces structural and limit checks that need no external state.
//!
//! ## Design Principles
//!
//! - **Fail-closed**: if any check errors, the presentment is rejected
//! - **No bypass**: every submission path goes through the validator
//! - **Side-effect-free**: rejection here touches no balance and no provider

use rust_decimal::Decimal;
use trustrail_types::{constants, Presentment, Result, TrustrailError};

/// Hard gate that validates presentments before the pipeline proper.
pub struct PresentmentValidator {
    /// Ceiling on a single presentment amount.
    max_amount: Decimal,
}

impl PresentmentValidator {
    /// Create a validator with the default amount ceiling.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_amount: Decimal::from(constants::DEFAULT_MAX_PRESENTMENT_AMOUNT),
        }
    }

    /// Create a validator with a custom amount ceiling.
    #[must_use]
    pub fn with_max_amount(max_amount: Decimal) -> Self {
        Self { max_amount }
    }

    /// Validate a presentment against all structural checks.
    ///
    /// # Errors
    /// Returns `ValidationFailed` naming the first check that fails.
    pub fn validate(&self, presentment: &Presentment) -> Result<()> {
        // 1. Amount must be strictly positive
        if presentment.amount.is_zero() || presentment.amount.is_sign_negative() {
            return Err(TrustrailError::ValidationFailed {
                reason: format!("amount {} must be positive", presentment.amount),
            });
        }

        // 2. Amount ceiling
        if presentment.amount > self.max_amount {
            return Err(TrustrailError::ValidationFailed {
                reason: format!(
                    "amount {} exceeds maximum {}",
                    presentment.amount, self.max_amount,
                ),
            });
        }

        // 3. Transaction id length bound
        if presentment.transaction_id.as_str().len() > constants::MAX_TRANSACTION_ID_LEN {
            return Err(TrustrailError::ValidationFailed {
                reason: format!(
                    "transaction id exceeds {} bytes",
                    constants::MAX_TRANSACTION_ID_LEN
                ),
            });
        }

        // 4. A null commitment hash can never name a registered trust check
        if presentment.commitment_hash == [0u8; 32] {
            return Err(TrustrailError::ValidationFailed {
                reason: "commitment hash is all zeroes".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for PresentmentValidator {
    fn default() -> Self {
        Self::new()
    }
}

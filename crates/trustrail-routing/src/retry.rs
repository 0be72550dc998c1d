//! Bounded retry with exponential backoff for transient provider faults.
//!
//! Only failures marked `retryable` are retried, always with the same
//! idempotency key, so a rail that half-processed an earlier attempt
//! collapses the duplicate instead of paying twice. Everything else
//! escalates on the first failure.

use std::time::Duration;

use trustrail_types::{Result, RetryConfig};

/// Retry driver for payout dispatch.
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Backoff before retry number `attempt` (1-based): `base * 2^(attempt-1)`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1_u64 << (attempt.saturating_sub(1)).min(16);
        Duration::from_millis(self.config.backoff_base_ms.saturating_mul(factor))
    }

    /// Run `op` until it succeeds, fails terminally, or the attempt budget
    /// is spent. The final error is returned unchanged.
    pub fn run<T>(&self, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let backoff = self.backoff(attempt);
                    tracing::debug!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "retrying payout dispatch: {err}"
                    );
                    std::thread::sleep(backoff);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

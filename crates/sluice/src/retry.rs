//! Retry utility: shared retry-with-backoff logic for remote FTP operations.
//!
//! Implements exponential backoff with jitter, max delay cap, and structured
//! error classification via [`MirrorError::is_transient`].

use std::thread;
use std::time::Duration;

use rand::RngExt;
use tracing::warn;

use crate::error::MirrorError;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Maximum number of retry attempts (not counting the initial attempt).
    pub max_retries: u32,
    /// Base delay between retries. Actual delay = base * 2^attempt + jitter.
    pub initial_delay: Duration,
    /// Hard cap on the computed delay to prevent unbounded growth.
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl BackoffPolicy {
    /// Compute the delay for a given retry number (0-indexed):
    /// `min(initial_delay * 2^attempt + jitter, max_delay)` with jitter
    /// drawn uniformly from `[0, 1s)`.
    pub(crate) fn delay_for_attempt(&self, attempt: u32) -> Duration {
        // 2^attempt is computed with a checked shift so attempts >= 32 saturate
        // instead of overflowing.
        let multiplier = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        let exp_delay = self
            .initial_delay
            .checked_mul(multiplier)
            .unwrap_or(self.max_delay);
        let jitter = Duration::from_millis(rand::rng().random_range(0..1000u64));
        exp_delay.saturating_add(jitter).min(self.max_delay)
    }
}

/// Execute an operation with retry-and-backoff.
///
/// Only errors classified as transient are retried; any other error is
/// returned immediately without sleeping. Once `max_retries` transient
/// failures have been retried, the last cause is wrapped in
/// [`MirrorError::RetryExhausted`].
pub fn run_with_backoff<T, F>(
    policy: &BackoffPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, MirrorError>
where
    F: FnMut() -> Result<T, MirrorError>,
{
    for attempt in 0..=policy.max_retries {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => {
                if attempt >= policy.max_retries {
                    return Err(MirrorError::RetryExhausted {
                        attempts: policy.max_retries,
                        source: Box::new(err),
                    });
                }
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    operation = label,
                    attempt = attempt + 1,
                    max = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Retrying after transient error"
                );
                thread::sleep(delay);
            }
            Err(err) => return Err(err),
        }
    }

    // Unreachable: the loop covers 0..=max_retries and the last iteration
    // returns on a transient error.
    unreachable!("retry loop exited without result")
}

//! Retry policy and exponential backoff for collector HTTP calls.
//!
//! The policy is an explicit value object passed into each collector, not a
//! decorator hidden around the call site. Only transient conditions are
//! retried; API-level and parse errors propagate immediately.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::CollectError;

/// Retry parameters for one collector: attempt budget, exponential backoff
/// base, and uniform jitter added to every delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first try.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 500,
            jitter_ms: 250,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (0-based): `base × 2^attempt`
    /// plus uniform jitter, saturating on extreme configurations.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .backoff_base_ms
            .saturating_mul(1u64 << attempt.min(62));
        let jitter_ms = if self.jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=self.jitter_ms)
        };
        Duration::from_millis(backoff_ms.saturating_add(jitter_ms))
    }
}

/// Returns `true` if `err` is transient and worth retrying after a delay.
///
/// Network-level failures and rate limiting are transient; API errors,
/// timeouts, and malformed responses are not — retrying would return the
/// same result.
fn is_retriable(err: &CollectError) -> bool {
    matches!(err, CollectError::Http(_) | CollectError::RateLimited { .. })
}

/// Executes `operation` with the policy's backoff schedule on transient
/// errors, returning the first success or the last error once the attempt
/// budget is spent.
///
/// # Errors
///
/// Propagates the operation's error: immediately for non-retriable errors,
/// after exhausting `max_retries` for transient ones.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, CollectError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollectError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient collection error, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

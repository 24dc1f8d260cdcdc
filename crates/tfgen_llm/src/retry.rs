//! Retry with exponential backoff for transient backend failures.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LlmError, LlmResult};

/// HTTP statuses treated as transient: rate limited, server error,
/// service unavailable, gateway timeout.
pub const RETRYABLE_STATUSES: [u16; 4] = [429, 500, 503, 504];

/// Backoff policy for backend calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub multiplier: u32,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 1_000,
            multiplier: 2,
            max_delay_ms: 60_000,
        }
    }
}

impl RetryPolicy {
    /// Policy that retries immediately, used by tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: 0,
            multiplier: 1,
            max_delay_ms: 0,
        }
    }

    /// Delay to wait before the given attempt (1-based). The first attempt
    /// never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = u64::from(self.multiplier).saturating_pow(attempt - 2);
        let millis = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(millis.min(self.max_delay_ms))
    }

    pub fn is_retryable_status(status: u16) -> bool {
        RETRYABLE_STATUSES.contains(&status)
    }
}

/// Outcome of a single failed attempt.
#[derive(Debug)]
pub enum AttemptError {
    /// Worth retrying
    Transient(String),
    /// Returned immediately
    Fatal(LlmError),
}

/// Run `operation` until it succeeds, fails fatally, or the policy's
/// attempt budget is spent. Exhaustion yields [`LlmError::Unavailable`].
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> LlmResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = String::from("no attempt made");

    for attempt in 1..=attempts {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Transient(message)) => {
                warn!(
                    backend = %label,
                    attempt,
                    attempts,
                    next_delay_ms = %policy.delay_before(attempt + 1).as_millis(),
                    "Transient backend failure: {}",
                    message
                );
                last_error = message;
            }
        }
    }

    Err(LlmError::Unavailable {
        attempts,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_default_delays_grow_exponentially() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_secs(1));
        assert_eq!(policy.delay_before(3), Duration::from_secs(2));
        assert_eq!(policy.delay_before(4), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_delay_ms: 1_000,
            multiplier: 7,
            max_delay_ms: 30_000,
        };
        assert_eq!(policy.delay_before(3), Duration::from_secs(7));
        assert_eq!(policy.delay_before(5), Duration::from_secs(30));
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [429, 500, 503, 504] {
            assert!(RetryPolicy::is_retryable_status(status));
        }
        for status in [400, 401, 404, 502] {
            assert!(!RetryPolicy::is_retryable_status(status));
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::immediate(5), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(AttemptError::Transient("503".to_string()))
                } else {
                    Ok("done")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_is_unavailable() {
        let calls = AtomicU32::new(0);
        let err = with_retry(&RetryPolicy::immediate(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(AttemptError::Transient("429 rate limited".to_string())) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            LlmError::Unavailable { attempts, last_error } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("429"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let err = with_retry(&RetryPolicy::immediate(5), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(AttemptError::Fatal(LlmError::Request("401".to_string()))) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!err.is_unavailable());
    }
}

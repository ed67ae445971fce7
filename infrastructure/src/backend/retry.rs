//! Retry policy with exponential backoff and jitter.
//!
//! Attempt `n` (0-indexed) that fails with a retryable error is followed by
//! a pause of `2^n * base_delay` plus a random jitter in `[0, max_jitter)`.

use super::error::{BackendError, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often, and how patiently, a request is retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay unit doubled after every failed attempt
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the random jitter added to each delay
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_jitter: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Retries without any pause, for tests and local backends
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Deterministic part of the pause after attempt `attempt` (0-indexed)
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Pause after attempt `attempt`, jitter included
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..jitter_ms))
        };
        self.base_backoff(attempt).saturating_add(jitter)
    }

    /// Whether `error` on attempt `attempt` (0-indexed) earns another try
    pub fn should_retry(&self, attempt: u32, error: &BackendError) -> bool {
        attempt + 1 < self.attempts() && error.is_retryable()
    }

    /// Run `operation` until it succeeds, fails for good, or attempts run out.
    ///
    /// The closure receives the 0-indexed attempt number. The last error is
    /// returned when every attempt failed.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if self.should_retry(attempt, &e) => {
                    let delay = self.backoff_for_attempt(attempt);
                    warn!(
                        "Attempt {}/{} failed: {}; retrying in {} ms",
                        attempt + 1,
                        self.attempts(),
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn http(status: u16) -> BackendError {
        BackendError::Http {
            url: "http://localhost:5000/api/llama3".to_string(),
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.base_backoff(0), Duration::from_millis(1000));
        assert_eq!(policy.base_backoff(1), Duration::from_millis(2000));
        assert_eq!(policy.base_backoff(2), Duration::from_millis(4000));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let policy = RetryPolicy::default();
        for attempt in 0..3 {
            for _ in 0..50 {
                let delay = policy.backoff_for_attempt(attempt);
                let base = policy.base_backoff(attempt);
                assert!(delay >= base);
                assert!(delay < base + Duration::from_millis(1000));
            }
        }
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_succeeds() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(3);

        let result = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 { Err(http(500)) } else { Ok("third time") }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "third time");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(3);

        let result: Result<()> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(http(404)) }
            })
            .await;

        assert_eq!(result.unwrap_err().status(), Some(404));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_surfaces_last_error_when_exhausted() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(3);

        let result: Result<()> = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(http(500 + attempt as u16)) }
            })
            .await;

        assert_eq!(result.unwrap_err().status(), Some(502));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_network_errors_are_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(2);

        let result: Result<()> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(BackendError::Network {
                        url: "http://localhost:5000".to_string(),
                        reason: "connection refused".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(BackendError::Network { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(0);

        let _: Result<()> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(http(500)) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

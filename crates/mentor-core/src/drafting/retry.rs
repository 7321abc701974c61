//! Bounded exponential backoff for transient service failures.

use std::future::Future;
use std::time::Duration;

use super::error::DraftError;
use super::trait_def::ServiceError;

/// Retry policy: attempt ceiling, base delay doubling per attempt, and
/// [`ServiceError::is_transient`] as the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. At least 1.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay to wait after the failed attempt with zero-based index `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `op` until it succeeds, fails non-transiently, or the attempt
    /// ceiling is reached. Attempts run sequentially.
    pub async fn run<T, F, Fut>(&self, service: &str, mut op: F) -> Result<T, DraftError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(DraftError::Service(err)),
                Err(err) => err,
            };

            attempt += 1;
            if attempt >= max_attempts {
                return Err(DraftError::RetriesExhausted {
                    attempts: attempt,
                    last: err,
                });
            }

            let delay = match err.retry_after() {
                Some(wait) => wait.max(self.delay_for(attempt - 1)),
                None => self.delay_for(attempt - 1),
            };
            tracing::warn!(
                service,
                status = err.status(),
                delay_ms = delay.as_millis() as u64,
                attempt,
                max_attempts,
                "transient service error, retrying: {err}"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

//! Bounded exponential-backoff retry for remote operations.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::constants;
use crate::errors::{GitHubError, MigrateError};

/// How often and how patiently a remote operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never less than one.
    pub max_attempts: u32,
    /// Wait before the second attempt; doubled before each later one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: constants::retry::MAX_ATTEMPTS,
            base_delay: Duration::from_secs(constants::retry::BASE_DELAY_SECS),
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

    /// Delay waited before attempt `attempt` (1-based); zero for the first.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        self.base_delay
            .checked_mul(2u32.saturating_pow(attempt - 2))
            .unwrap_or(Duration::MAX)
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.delay_before(self.max_attempts.max(2)))
            .with_factor(2.0)
            .with_max_times(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Run `operation` until it succeeds or the policy's attempts are spent.
///
/// On exhaustion the last error is returned inside `MigrateError::Remote`
/// together with `context` and the number of attempts made.
pub async fn retry_operation<T, F, Fut>(
    policy: &RetryPolicy,
    context: impl Into<String>,
    mut operation: F,
) -> Result<T, MigrateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GitHubError>>,
{
    let context = context.into();
    let attempts = AtomicU32::new(0);

    let attempt_op = || {
        attempts.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    attempt_op
        .retry(policy.backoff())
        .sleep(tokio::time::sleep)
        .notify(|err: &GitHubError, wait: Duration| {
            tracing::warn!(
                "{}: attempt {} failed, retrying in {:?}: {}",
                context,
                attempts.load(Ordering::SeqCst),
                wait,
                err
            );
        })
        .await
        .map_err(|source| MigrateError::Remote {
            context: context.clone(),
            attempts: attempts.load(Ordering::SeqCst),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn transient() -> GitHubError {
        GitHubError::HttpError("connection reset".to_string())
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_secs(1));
        assert_eq!(policy.delay_before(3), Duration::from_secs(2));
    }

    #[test]
    fn test_delay_schedule_saturates() {
        let policy = RetryPolicy::new(40, Duration::from_secs(10_000_000_000));
        assert_eq!(policy.delay_before(40), Duration::MAX);
        assert_eq!(policy.delay_before(2), Duration::from_secs(10_000_000_000));
    }

    #[test]
    fn test_new_clamps_attempts() {
        assert_eq!(RetryPolicy::new(0, Duration::from_secs(1)).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_does_not_wait() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result = retry_operation(&RetryPolicy::default(), "list", || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, GitHubError>(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_after_two_delays() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result = retry_operation(&RetryPolicy::default(), "list", || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 { Err(transient()) } else { Ok(n) }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "waited {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(4), "waited {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error_with_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result: Result<(), MigrateError> =
            retry_operation(&RetryPolicy::default(), "failed to create org variable FOO", || {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(GitHubError::HttpError(format!("failure {}", n)))
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_secs(3));
        match result {
            Err(MigrateError::Remote {
                context,
                attempts,
                source,
            }) => {
                assert_eq!(context, "failed to create org variable FOO");
                assert_eq!(attempts, 3);
                assert_eq!(source.to_string(), "HTTP error: failure 3");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_policy_never_waits() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();
        let policy = RetryPolicy::new(1, Duration::from_secs(5));

        let result: Result<(), MigrateError> = retry_operation(&policy, "list", || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(transient())
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

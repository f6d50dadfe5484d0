use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Exponential backoff schedule used while establishing connections.
///
/// Attempt `n` (zero-based) waits `base_delay * 2^n`, capped at `max_delay`.
/// With jitter enabled the wait is scaled to somewhere between 50% and 100%.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Un-jittered wait before retry number `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn sleep_for(&self, attempt: u32) -> Duration {
        let delay = self.delay_for(attempt);
        if self.jitter { jittered(delay) } else { delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

/// Runs `operation` until it succeeds or the policy runs out of retries.
///
/// The last error is returned unchanged.
pub async fn retry_with_backoff<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(retries = attempt, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) if attempt >= policy.max_retries => {
                warn!(attempts = attempt + 1, error = %e, "Giving up after retries");
                return Err(e);
            }
            Err(e) => {
                let wait = policy.sleep_for(attempt);
                attempt += 1;
                debug!(
                    attempt,
                    max_retries = policy.max_retries,
                    wait_ms = wait.as_millis() as u64,
                    error = %e,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(wait).await;
            }
        }
    }
}

// Scales the delay into [50%, 100%] using the process hasher as an entropy source.
fn jittered(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let roll = RandomState::new().hash_one(std::time::SystemTime::now()) % 51;
    delay.mul_f64(0.5 + roll as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries)
            .with_base_delay(Duration::from_millis(5))
            .without_jitter()
    }

    #[test]
    fn test_delay_doubles_until_capped() {
        let policy = RetryPolicy::new(10)
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(700))
            .without_jitter();

        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(700));
        assert_eq!(policy.delay_for(40), Duration::from_millis(700));
    }

    #[test]
    fn test_jitter_stays_within_half_and_full_delay() {
        let delay = Duration::from_millis(1000);
        for _ in 0..20 {
            let wait = jittered(delay);
            assert!(wait >= Duration::from_millis(500));
            assert!(wait <= delay);
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = retry_with_backoff(&fast_policy(3), || {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("not yet")
                } else {
                    Ok("connected")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("connected"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_exhausted() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), String> = retry_with_backoff(&fast_policy(2), || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Err(format!("failure {n}"))
            }
        })
        .await;

        assert_eq!(result, Err("failure 2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}

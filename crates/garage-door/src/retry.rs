//! Retry policy for transient hardware failures.

use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// A fixed-interval retry policy, optionally bounded.
///
/// Pin acquisition uses the unbounded form: on Raspbian class systems
/// access to a freshly exported GPIO line is granted in the background
/// a moment later, so the only sensible reaction is to keep trying.
///
/// # Examples
///
/// ```
/// use garage_door::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::fixed(Duration::from_millis(200));
/// assert!(policy.max_attempts.is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Delay before each attempt.
    pub interval: Duration,

    /// Give up after this many attempts; `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Unbounded retry on a fixed interval.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    /// Retry at most `max_attempts` times on a fixed interval.
    pub fn bounded(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
        }
    }

    /// Drive `attempt` until it succeeds or the policy is exhausted.
    ///
    /// The first invocation happens after one interval has elapsed: the
    /// caller is expected to have already tried once before reaching for
    /// the policy. Returns `None` only for bounded policies.
    pub async fn run<T, E, F>(&self, mut attempt: F) -> Option<T>
    where
        F: FnMut() -> Result<T, E>,
        E: fmt::Display,
    {
        let mut attempts = 0u32;
        loop {
            sleep(self.interval).await;
            attempts += 1;
            match attempt() {
                Ok(value) => return Some(value),
                Err(err) => {
                    warn!(attempts, %err, "retry attempt failed");
                    if self.max_attempts.is_some_and(|max| attempts >= max) {
                        return None;
                    }
                }
            }
        }
    }
}

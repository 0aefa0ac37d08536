use super::Error;
use std::time::Duration;

/// How a failed call is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and carry on with `None`.
    FailSoft,
    /// Log the failure and hand it back.
    FailHard,
}

impl FailurePolicy {
    pub fn resolve<T>(self, path: &str, result: Result<Option<T>, Error>) -> Result<Option<T>, Error> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                log::error!("Call to {} failed: {}", path, e);
                match self {
                    FailurePolicy::FailSoft => Ok(None),
                    FailurePolicy::FailHard => Err(e),
                }
            }
        }
    }
}

/// What to do when the API reports that too many requests were made.
///
/// Only [`Error::RateExceeded`] is ever retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    Never,
    ExponentialBackoff {
        max_retries: u32,
        initial_delay: Duration,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Never
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based), or `None` to give up.
    pub fn backoff(&self, attempt: u32, error: &Error) -> Option<Duration> {
        match self {
            RetryPolicy::Never => None,
            RetryPolicy::ExponentialBackoff {
                max_retries,
                initial_delay,
            } => {
                if !error.is_rate_exceeded() || attempt >= *max_retries {
                    return None;
                }
                Some(initial_delay.saturating_mul(2u32.saturating_pow(attempt)))
            }
        }
    }
}

/// Pause inserted between consecutive calls of a batch, to stay below the
/// rate limiter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Throttle {
    pub delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

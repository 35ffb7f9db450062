use crate::errors::FinetuneError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Errors that can tell a retry loop whether another attempt is worthwhile.
pub trait Retryable {
    fn is_transient(&self) -> bool;

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl Retryable for FinetuneError {
    fn is_transient(&self) -> bool {
        self.is_retryable()
    }

    fn retry_after(&self) -> Option<Duration> {
        FinetuneError::retry_after(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DelayStrategy {
    /// Same pause before every retry.
    Fixed(Duration),
    /// `initial * multiplier^(attempt-1)`, capped at `max`. Honors `retry-after`.
    Exponential {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// Retry whatever the failure was.
    Any,
    /// Retry only failures reported as transient.
    Transient,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of calls, including the first one.
    pub max_attempts: u32,
    pub delay: DelayStrategy,
    pub retry_on: RetryCondition,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: DelayStrategy::Fixed(Duration::from_secs(5)),
            retry_on: RetryCondition::Any,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay: DelayStrategy::Fixed(delay),
            retry_on: RetryCondition::Any,
        }
    }

    pub fn exponential(max_attempts: u32, initial: Duration, max: Duration) -> Self {
        Self {
            max_attempts,
            delay: DelayStrategy::Exponential {
                initial,
                max,
                multiplier: 2.0,
            },
            retry_on: RetryCondition::Transient,
        }
    }

    /// A single attempt with no retries.
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    pub fn with_retry_on(mut self, retry_on: RetryCondition) -> Self {
        self.retry_on = retry_on;
        self
    }

    pub fn should_retry<E: Retryable>(&self, error: &E) -> bool {
        match self.retry_on {
            RetryCondition::Any => true,
            RetryCondition::Transient => error.is_transient(),
        }
    }

    /// Pause before the retry that follows failed attempt number `attempt` (1-based).
    pub fn delay_for<E: Retryable>(&self, attempt: u32, error: &E) -> Duration {
        match &self.delay {
            DelayStrategy::Fixed(delay) => *delay,
            DelayStrategy::Exponential {
                initial,
                max,
                multiplier,
            } => {
                if let Some(after) = error.retry_after() {
                    return after.min(*max);
                }
                let exponent = attempt.saturating_sub(1) as i32;
                let millis = initial.as_millis() as f64 * multiplier.powi(exponent);
                Duration::from_millis(millis.min(max.as_millis() as f64) as u64)
            }
        }
    }
}

/// Runs `operation` until it succeeds or the policy gives up, returning the
/// last error unchanged. `on_retry` sees each failure that will be retried
/// together with the upcoming pause.
pub async fn retry_with_policy<T, E, F, Fut, H>(
    policy: &RetryPolicy,
    mut on_retry: H,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable,
    H: FnMut(u32, &E, Duration),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= max_attempts || !policy.should_retry(&error) {
                    return Err(error);
                }

                let delay = policy.delay_for(attempt, &error);
                on_retry(attempt, &error, delay);
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}

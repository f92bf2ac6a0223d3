//! Retry policies and the generic retry wrapper every outbound call goes through.

use std::{future::Future, time::Duration};

use crate::error::{retry::ErrorRetryStrategy, Error};

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// `base`, `2 * base`, `4 * base`, ...
    Exponential { base: u64 },
    /// `start`, `start + step`, ... stopping once the delay would pass `ceiling`.
    LinearRamp { start: u64, step: u64, ceiling: u64 },
    /// The same delay every time.
    Constant { interval: u64 },
}

/// Answers "how long until the next attempt, or stop" given the number of failed attempts.
///
/// Delays are counted in `unit`s so the same policy shape can run on seconds in production
/// and milliseconds in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub strategy: BackoffStrategy,
    pub max_tries: u32,
    pub unit: Duration,
}

impl BackoffPolicy {
    const DEFAULT_MAX_TRIES: u32 = 3;

    pub fn new(strategy: BackoffStrategy, max_tries: u32) -> Self {
        Self {
            strategy,
            max_tries,
            unit: Duration::from_secs(1),
        }
    }

    /// Doubling delay from one unit, 3 tries. Used for credential and metadata calls.
    pub fn bounded_exponential() -> Self {
        Self::new(
            BackoffStrategy::Exponential { base: 1 },
            Self::DEFAULT_MAX_TRIES,
        )
    }

    /// 5, 15, 25, 35, 45 units, 3 tries. Used for alert queries.
    pub fn linear_ramp() -> Self {
        Self::new(
            BackoffStrategy::LinearRamp {
                start: 5,
                step: 10,
                ceiling: 45,
            },
            Self::DEFAULT_MAX_TRIES,
        )
    }

    /// Fixed `interval` units, 3 tries. Used for AOI, geostore and dataset lookups.
    pub fn constant(interval: u64) -> Self {
        Self::new(
            BackoffStrategy::Constant { interval },
            Self::DEFAULT_MAX_TRIES,
        )
    }

    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Delay before the next attempt after `failed_attempts` failures, or `None` to give up.
    pub fn next_delay(&self, failed_attempts: u32) -> Option<Duration> {
        if failed_attempts == 0 {
            return Some(Duration::ZERO);
        }
        if failed_attempts >= self.max_tries {
            return None;
        }

        let units = match self.strategy {
            BackoffStrategy::Exponential { base } => {
                let exponent = (failed_attempts - 1).min(31);
                base.saturating_mul(1_u64 << exponent)
            }
            BackoffStrategy::LinearRamp {
                start,
                step,
                ceiling,
            } => {
                let delay =
                    start.saturating_add(step.saturating_mul(u64::from(failed_attempts - 1)));
                if delay > ceiling {
                    return None;
                }
                delay
            }
            BackoffStrategy::Constant { interval } => interval,
        };

        Some(self.unit.saturating_mul(u32::try_from(units).unwrap_or(u32::MAX)))
    }
}

/// Runs an operation under a [`BackoffPolicy`].
pub struct RetryContext {
    policy: BackoffPolicy,
}

impl RetryContext {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy }
    }

    /// Execute an operation with automatic retry logic
    ///
    /// Errors whose [`Error::to_retry_strategy`] is `Fail` return immediately. Retryable
    /// errors back off per the policy until it says stop, then the last error is returned.
    /// The operation is re-invoked from scratch on every attempt, so anything it acquires
    /// (a concurrency permit, a credential) is released between attempts.
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging, naming what failed
    /// - `operation`: Produces one attempt's future
    pub async fn execute_with_retry<R, F, Fut>(
        &self,
        description: &str,
        mut operation: F,
    ) -> Result<R, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let mut failed_attempts = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                failed_attempts + 1,
                self.policy.max_tries
            );

            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        tracing::error!("Permanent error for {}: {}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry => {
                        failed_attempts += 1;

                        let Some(wait) = self.policy.next_delay(failed_attempts) else {
                            tracing::error!(
                                tries = failed_attempts,
                                "Giving up on {} after {} tries: {}",
                                description,
                                failed_attempts,
                                e
                            );
                            return Err(e);
                        };

                        tracing::warn!(
                            tries = failed_attempts,
                            wait_secs = wait.as_secs_f64(),
                            "Backing off {:.1} seconds after {} tries calling {}: {}",
                            wait.as_secs_f64(),
                            failed_attempts,
                            description,
                            e
                        );

                        tokio::time::sleep(wait).await;
                    }
                },
            }
        }
    }
}

//! Fixed-interval retry policy and a generic "retry until success or cap" runner

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry configuration: fixed interval, optional attempt cap, optional random jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Upper bound of a uniformly random extra delay.
    pub jitter: Option<Duration>,
}

impl RetryPolicy {
    /// Retry forever at a fixed interval.
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            jitter: None,
        }
    }

    pub fn capped(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
            jitter: None,
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Delay before the next attempt.
    pub fn delay(&self) -> Duration {
        match self.jitter {
            Some(jitter) if !jitter.is_zero() => {
                jitter_between(self.interval, self.interval + jitter)
            }
            _ => self.interval,
        }
    }

    /// Whether another attempt is allowed after `attempts` failures.
    pub fn allows_another(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }
}

pub fn jitter_between(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let mut rng = rand::thread_rng();
    let min_secs = min.as_secs_f64();
    let span = max.as_secs_f64() - min_secs;
    let sample = rng.gen::<f64>() * span + min_secs;
    Duration::from_secs_f64(sample)
}

/// Outcome of [`retry_until_success`]: the final result and how many attempts it took.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub attempts: u32,
    pub result: Result<T, E>,
}

/// Run `op` until it succeeds or the policy's cap is reached.
///
/// `op` receives the 1-based attempt number. With an unbounded policy this only returns
/// on success.
pub async fn retry_until_success<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> RetryOutcome<T, E>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match op(attempts).await {
            Ok(value) => {
                if attempts > 1 {
                    tracing::info!(operation = label, attempts, "succeeded after retry");
                }
                return RetryOutcome {
                    attempts,
                    result: Ok(value),
                };
            }
            Err(e) => {
                if !policy.allows_another(attempts) {
                    tracing::error!(
                        operation = label,
                        attempts,
                        error = %e,
                        "retry exhausted"
                    );
                    return RetryOutcome {
                        attempts,
                        result: Err(e),
                    };
                }
                let delay = policy.delay();
                tracing::warn!(
                    operation = label,
                    attempt = attempts,
                    error = %e,
                    retry_in_ms = delay.as_millis() as u64,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

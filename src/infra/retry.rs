//! Bounded exponential backoff for provider calls
//!
//! Only transient failures are retried: transport errors, timeouts, 429
//! and 5xx responses (all surfaced as `RiskError::ProviderUnavailable`).
//! Credential rejections and malformed bodies fail immediately.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use super::{Result, RiskError};

/// Retry behavior for one provider
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 = single attempt)
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Cap on any single delay
    pub max_delay: Duration,
    /// Backoff multiplier per attempt
    pub multiplier: f64,
    /// Jitter factor in 0.0..=1.0; the delay varies by up to this fraction
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: 0.3,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Millisecond delays, for tests and local stubs
    pub fn fast() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(50),
            multiplier: 2.0,
            jitter: 0.0,
        }
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Delay before retry number `attempt` (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());

        let delay = if self.jitter > 0.0 {
            let spread = capped * self.jitter;
            let offset = rand::thread_rng().gen_range(-spread..=spread);
            (capped + offset).max(0.0)
        } else {
            capped
        };

        Duration::from_secs_f64(delay)
    }
}

/// Outcome of a retried call
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T>,
    /// Attempts made, 1 = first try
    pub attempts: u32,
}

/// Run `operation` until it succeeds, fails permanently, or retries run out.
pub async fn retry_provider_call<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> RetryOutcome<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    tracing::info!(
                        operation = operation_name,
                        attempts,
                        "Provider call succeeded after retries"
                    );
                }
                return RetryOutcome {
                    result: Ok(value),
                    attempts,
                };
            }
            Err(e) if attempts > config.max_retries || !e.is_retryable() => {
                return RetryOutcome {
                    result: Err(e),
                    attempts,
                };
            }
            Err(e) => {
                let delay = config.delay_for_attempt(attempts - 1);
                tracing::warn!(
                    operation = operation_name,
                    attempt = attempts,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Provider call failed, will retry"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Whether an HTTP status from a provider should be retried
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

/// Map a transport-level reqwest error to the provider taxonomy
pub fn classify_transport_error(
    provider: crate::domain::Source,
    err: &reqwest::Error,
) -> RiskError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    RiskError::ProviderUnavailable { provider, reason }
}

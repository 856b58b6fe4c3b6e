//! Bounded retry with exponential backoff

use rand::Rng;
use std::future::Future;
use std::time::Duration;

use super::scrape_types::ScrapeResult;
use crate::config::ScrapeConfig;

/// How often and how patiently a step is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound of the random delay added to each backoff
    pub jitter: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            jitter: base_delay / 4,
        }
    }

    #[must_use]
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::new(config.max_attempts(), config.retry_delay())
    }

    /// Delay before attempt `attempt + 1`, where `attempt` is 1-based
    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1u32 << (attempt - 1).min(16));
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            exp
        } else {
            exp.saturating_add(Duration::from_millis(rand::rng().random_range(0..jitter_ms)))
        }
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or
    /// `max_attempts` is reached. The closure receives the 1-based attempt.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut op: F) -> ScrapeResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ScrapeResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => {
                    log::debug!("{operation_name}: not retrying: {e}");
                    return Err(e);
                }
                Err(e) if attempt >= self.max_attempts => {
                    log::warn!("{operation_name}: giving up after {attempt} attempts: {e}");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.backoff(attempt);
                    log::warn!(
                        "{operation_name}: attempt {attempt}/{} failed, retrying in {}ms: {e}",
                        self.max_attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

//! Retry mechanism with exponential backoff

use super::types::RetryConfig;
use crate::utils::error::Result;
use tracing::{debug, warn};

/// Bounded exponential backoff around a single remote call.
///
/// Only errors whose message matches one of the configured transient
/// fragments are retried; everything else is returned unchanged on the spot.
/// A call is attempted at most `max_retries + 1` times.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute `f` with retry logic
    pub async fn call<F, Fut, T>(&self, operation: &str, mut f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut remaining = self.config.max_retries;
        let mut delay = self.config.initial_delay();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "Retry succeeded");
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if remaining == 0 || !error.is_transient(&self.config.transient_messages) {
                        if attempt > 1 {
                            warn!(operation, attempts = attempt, error = %error, "Giving up after retries");
                        }
                        return Err(error);
                    }

                    debug!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient failure, retrying"
                    );

                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    remaining -= 1;
                }
            }
        }
    }
}

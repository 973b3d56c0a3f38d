//! Retry configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Message fragments that mark a remote failure as worth retrying
pub const DEFAULT_TRANSIENT_MESSAGES: &[&str] = &[
    "failed while accessing document with id",
    "internal error",
    "rate limit exceeded",
    "quota exceeded",
];

/// Retry configuration for single (non-batched) remote calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled after every retry
    pub initial_delay_ms: u64,
    /// Case-insensitive message fragments classifying an error as transient
    pub transient_messages: Vec<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 4,
            initial_delay_ms: 8_000,
            transient_messages: DEFAULT_TRANSIENT_MESSAGES
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl RetryConfig {
    /// Create a config with the default transient messages
    pub fn new(max_retries: u32, initial_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay_ms,
            ..Default::default()
        }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Total time spent sleeping when every retry is consumed:
    /// `initial_delay * (2^max_retries - 1)`
    pub fn worst_case_sleep(&self) -> Duration {
        let factor = 2u64
            .saturating_pow(self.max_retries)
            .saturating_sub(1);
        Duration::from_millis(self.initial_delay_ms.saturating_mul(factor))
    }
}

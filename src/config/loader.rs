//! Configuration loading utilities
//!
//! This module layers environment variable overrides on top of file configuration.

use super::models::*;
use crate::utils::error::{Result, SyncError};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Environment variable holding the bearer token
pub const ACCESS_TOKEN_ENV: &str = "ADSYNC_ACCESS_TOKEN";

impl SyncConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `ADSYNC_*` environment variables to this configuration
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|name| env::var(name).ok())
    }

    /// Apply overrides resolved through `lookup`
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("ADSYNC_BASE_URL") {
            self.platform.base_url = base_url;
        }
        if let Some(batch_url) = lookup("ADSYNC_BATCH_URL") {
            self.platform.batch_url = batch_url;
        }
        if let Some(token) = lookup(ACCESS_TOKEN_ENV) {
            self.platform.access_token = Some(token);
        }
        if let Some(chunk_size) = lookup("ADSYNC_CHUNK_SIZE") {
            self.batch.chunk_size = parse_var("ADSYNC_CHUNK_SIZE", &chunk_size)?;
        }
        if let Some(max_retries) = lookup("ADSYNC_MAX_RETRIES") {
            self.retry.max_retries = parse_var("ADSYNC_MAX_RETRIES", &max_retries)?;
        }
        if let Some(delay) = lookup("ADSYNC_INITIAL_DELAY_MS") {
            self.retry.initial_delay_ms = parse_var("ADSYNC_INITIAL_DELAY_MS", &delay)?;
        }
        if let Some(secs) = lookup("ADSYNC_MAX_EXECUTION_SECS") {
            self.job.max_execution_secs = parse_var("ADSYNC_MAX_EXECUTION_SECS", &secs)?;
        }

        debug!("Environment overrides applied");
        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| SyncError::config(format!("Invalid {}: {}", name, e)))
}

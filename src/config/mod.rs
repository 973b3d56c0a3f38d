//! Configuration management for sync jobs
//!
//! This module handles loading, validation, and management of all sync configuration.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::ACCESS_TOKEN_ENV;
pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, SyncError};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for a sync job
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Sync configuration
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SyncError::Config(format!("Failed to read config file: {}", e)))?;

        let mut sync: SyncConfig = serde_yaml::from_str(&content)?;
        sync.apply_env_overrides()?;

        let config = Self { sync };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let sync = SyncConfig::from_env()?;
        let config = Self { sync };

        config.validate()?;
        Ok(config)
    }

    pub fn platform(&self) -> &PlatformConfig {
        &self.sync.platform
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.sync.retry
    }

    pub fn batch(&self) -> &BatchConfig {
        &self.sync.batch
    }

    pub fn targeting(&self) -> &TargetingConfig {
        &self.sync.targeting
    }

    pub fn job(&self) -> &JobConfig {
        &self.sync.job
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.sync
            .validate()
            .map_err(|e| SyncError::validation(format!("Invalid configuration: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.sync)?)
    }
}

//! Sync configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::batch::MAX_BATCH_SIZE;
use crate::utils::net::ClientUtils;
use std::collections::HashSet;
use tracing::debug;

impl Validate for SyncConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating sync configuration");

        self.platform.validate()?;
        self.retry.validate()?;
        self.batch.validate()?;
        self.targeting.validate()?;
        self.job.validate()?;

        debug!("Sync configuration validation completed");
        Ok(())
    }
}

impl Validate for PlatformConfig {
    fn validate(&self) -> Result<(), String> {
        ClientUtils::validate_url(&self.base_url)
            .map_err(|e| format!("Invalid base_url: {}", e))?;
        ClientUtils::validate_url(&self.batch_url)
            .map_err(|e| format!("Invalid batch_url: {}", e))?;

        if self.timeout == 0 {
            return Err("Platform timeout must be greater than 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("User agent cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err("max_retries should not exceed 10".to_string());
        }
        if self.max_retries > 0 && self.initial_delay_ms == 0 {
            return Err("initial_delay_ms must be greater than 0 when retries are enabled".to_string());
        }
        if self.transient_messages.iter().any(|m| m.trim().is_empty()) {
            return Err("Transient messages cannot be blank".to_string());
        }
        Ok(())
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("Batch chunk_size must be greater than 0".to_string());
        }
        if self.chunk_size > MAX_BATCH_SIZE {
            return Err(format!(
                "Batch chunk_size must not exceed {}",
                MAX_BATCH_SIZE
            ));
        }
        Ok(())
    }
}

impl Validate for TargetingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled.is_empty() {
            return Err("At least one targeting type must be enabled".to_string());
        }
        let mut seen = HashSet::new();
        for targeting_type in &self.enabled {
            if !seen.insert(targeting_type) {
                return Err(format!("Duplicate targeting type: {}", targeting_type));
            }
        }
        Ok(())
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_execution_secs == 0 {
            return Err("max_execution_secs must be greater than 0".to_string());
        }
        let mut seen = HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity) {
                return Err(format!("Duplicate entity type: {}", entity));
            }
        }
        Ok(())
    }
}

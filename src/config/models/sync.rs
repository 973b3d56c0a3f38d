//! Top-level sync configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Everything a sync job needs, as read from the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub targeting: TargetingConfig,
    #[serde(default)]
    pub job: JobConfig,
}

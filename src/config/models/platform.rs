//! Remote platform configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Remote ad platform endpoints and transport settings
#[derive(Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL for single calls
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Batch endpoint URL
    #[serde(default = "default_batch_url")]
    pub batch_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with every call
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Bearer token; normally supplied through `ADSYNC_ACCESS_TOKEN`
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            batch_url: default_batch_url(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            access_token: None,
        }
    }
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url)
            .field("batch_url", &self.batch_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

//! Supported targeting types

use crate::core::models::TargetingType;
use serde::{Deserialize, Serialize};

/// The closed set of targeting types a job reconciles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: Vec<TargetingType>,
}

fn default_enabled() -> Vec<TargetingType> {
    TargetingType::ALL.to_vec()
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

impl TargetingConfig {
    pub fn is_enabled(&self, targeting_type: TargetingType) -> bool {
        self.enabled.contains(&targeting_type)
    }
}

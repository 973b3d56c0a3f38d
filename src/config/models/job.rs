//! Job execution configuration

use super::*;
use crate::core::sync::EntityType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Wall-clock ceiling checked between advertisers and chunks
    #[serde(default = "default_max_execution_secs")]
    pub max_execution_secs: u64,
    /// Entity loaders registered at startup
    #[serde(default = "default_entities")]
    pub entities: Vec<EntityType>,
}

fn default_entities() -> Vec<EntityType> {
    vec![EntityType::InsertionOrder, EntityType::LineItem]
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            max_execution_secs: default_max_execution_secs(),
            entities: default_entities(),
        }
    }
}

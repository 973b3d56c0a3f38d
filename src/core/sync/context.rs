//! Per-run collaborators

use crate::config::Config;
use crate::core::batch::{BatchExecutor, BatchRequestBuilder, BatchTransport};
use crate::core::checkpoint::{Checkpoint, ExecutionBudget};
use crate::core::correlation::LogSink;
use crate::core::models::TargetingType;
use crate::core::platform::{PlatformApi, PlatformClient};
use crate::utils::error::{Result, RetryPolicy};
use std::sync::Arc;

/// Everything a job talks to, built explicitly for one run
#[derive(Clone)]
pub struct JobContext {
    pub platform: Arc<dyn PlatformApi>,
    pub executor: Arc<dyn BatchExecutor>,
    pub sink: Arc<dyn LogSink>,
    pub checkpoint: Arc<dyn Checkpoint>,
    pub builder: BatchRequestBuilder,
    pub targeting_types: Vec<TargetingType>,
}

impl JobContext {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        executor: Arc<dyn BatchExecutor>,
        sink: Arc<dyn LogSink>,
        checkpoint: Arc<dyn Checkpoint>,
    ) -> Self {
        Self {
            platform,
            executor,
            sink,
            checkpoint,
            builder: BatchRequestBuilder::default(),
            targeting_types: TargetingType::ALL.to_vec(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.builder = BatchRequestBuilder::new(chunk_size);
        self
    }

    pub fn with_targeting_types(mut self, targeting_types: Vec<TargetingType>) -> Self {
        self.targeting_types = targeting_types;
        self
    }

    /// HTTP client, batch transport and execution budget from configuration
    pub fn from_config(config: &Config, sink: Arc<dyn LogSink>) -> Result<Self> {
        let platform = PlatformClient::new(config.platform(), RetryPolicy::new(config.retry().clone()))?;
        let executor = BatchTransport::new(config.platform())?;
        let budget = ExecutionBudget::from_secs(config.job().max_execution_secs);

        Ok(Self::new(
            Arc::new(platform),
            Arc::new(executor),
            sink,
            Arc::new(budget),
        )
        .with_chunk_size(config.batch().chunk_size)
        .with_targeting_types(config.targeting().enabled.clone()))
    }

    pub fn should_continue(&self) -> bool {
        self.checkpoint.should_continue()
    }
}

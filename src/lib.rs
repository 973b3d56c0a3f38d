//! # adsync
//!
//! Additive targeting sync for ad-serving line items.
//!
//! ## Features
//!
//! - **Batched RPC**: operations are chunked (at most 500 per call) and framed
//!   as `multipart/mixed` requests against the platform's batch endpoint
//! - **Failure attribution**: per-operation errors carry no request reference,
//!   so failed operations are found by elimination against the successes
//! - **Retry**: single calls back off exponentially on transient failures
//! - **Additive diff**: only options missing from a line item are created;
//!   nothing remote is ever removed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use adsync::{Config, JobContext, LoaderRegistry, SyncJob, TracingLogSink};
//! use adsync::core::models::parse_feed;
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/adsync.yaml").await?;
//!     let ctx = JobContext::from_config(&config, Arc::new(TracingLogSink))?;
//!     let job = SyncJob::new(ctx, LoaderRegistry::from_config(&config.job().entities));
//!
//!     let rows = parse_feed(&std::fs::read_to_string("rows.json")?)?;
//!     let summary = job.push(&rows).await?;
//!     println!("{} operations, {} failures", summary.operations, summary.failures());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{Result, RetryConfig, RetryPolicy, SyncError};

pub use core::batch::{
    BatchExecutor, BatchOperation, BatchOutcome, BatchRequestBuilder, BatchTransport,
    execute_all,
};
pub use core::checkpoint::{Checkpoint, ExecutionBudget};
pub use core::correlation::{
    ApiFailure, AttributedFailure, ErrorCorrelator, FailureReport, LogSink, MemoryLogSink,
    TracingLogSink,
};
pub use core::diff::{BulkEditPayload, TargetingDiffEngine};
pub use core::platform::{PlatformApi, PlatformClient};
pub use core::sync::{EntityType, JobContext, LoaderRegistry, SyncJob, SyncSummary};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build time, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("ADSYNC_BUILD_TIME"),
            git_hash: env!("ADSYNC_GIT_HASH"),
        }
    }
}

/// Version and build metadata of this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

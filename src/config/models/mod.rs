//! Configuration data models
//!
//! This module defines all configuration structures used by a sync job.

#![allow(missing_docs)]

pub mod batch;
pub mod job;
pub mod platform;
pub mod sync;
pub mod targeting;

// Re-export all configuration types
pub use crate::utils::error::RetryConfig;
pub use batch::*;
pub use job::*;
pub use platform::*;
pub use sync::*;
pub use targeting::*;

/// Default platform API base URL
pub fn default_base_url() -> String {
    "https://displayvideo.googleapis.com/v1".to_string()
}

/// Default batch endpoint URL
pub fn default_batch_url() -> String {
    "https://displayvideo.googleapis.com/batch".to_string()
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    60
}

/// Default user agent
pub fn default_user_agent() -> String {
    format!("adsync/{}", env!("CARGO_PKG_VERSION"))
}

/// Default number of operations per batch call
pub fn default_chunk_size() -> usize {
    crate::core::batch::MAX_BATCH_SIZE
}

/// Default wall-clock ceiling for one job, in seconds
pub fn default_max_execution_secs() -> u64 {
    270
}

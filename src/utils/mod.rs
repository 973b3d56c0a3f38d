//! Utility modules for adsync
//!
//! ## Module Organization
//!
//! - **error**: Error taxonomy and retry with backoff
//! - **net**: HTTP client construction and URL helpers

pub mod error;
pub mod net;

pub use error::{Result, RetryConfig, RetryPolicy, SyncError};
pub use net::ClientUtils;

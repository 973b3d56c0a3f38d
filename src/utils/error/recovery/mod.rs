//! Error recovery utilities
//!
//! Retry with exponential backoff for single remote calls. Batch calls are
//! never retried as a whole.

mod retry;
mod types;

pub use retry::RetryPolicy;
pub use types::{DEFAULT_TRANSIENT_MESSAGES, RetryConfig};

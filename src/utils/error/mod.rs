//! Error handling utilities
//!
//! This module provides the crate error type and the retry policy for
//! transient remote failures.

pub mod error;
pub mod recovery;

// Re-export commonly used types and functions
pub use error::*;
pub use recovery::*;

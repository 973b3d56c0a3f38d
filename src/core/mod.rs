//! Core functionality for targeting sync
//!
//! This module contains the domain model, the batch protocol, error
//! correlation, the diff engine and the jobs that tie them together.

pub mod batch;
pub mod checkpoint;
pub mod correlation;
pub mod diff;
pub mod models;
pub mod platform;
pub mod sync;

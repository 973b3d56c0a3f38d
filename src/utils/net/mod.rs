//! Network utilities

pub mod client;

pub use client::ClientUtils;

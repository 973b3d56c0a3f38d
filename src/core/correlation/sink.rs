//! Failure records and where they go

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A failure tied back to the line item whose operation produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedFailure {
    pub advertiser_id: String,
    pub line_item_id: String,
    pub status_message: String,
    /// Message of an error item that named this line item, when one did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// An error item that could not be tied to any operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub error_code: String,
    pub error_message: String,
}

/// Receives the two failure record streams
pub trait LogSink: Send + Sync {
    fn attributed(&self, failure: &AttributedFailure);
    fn unattributed(&self, failure: &ApiFailure);
}

/// Emits every record as a structured `warn!` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn attributed(&self, failure: &AttributedFailure) {
        warn!(
            advertiser_id = %failure.advertiser_id,
            line_item_id = %failure.line_item_id,
            detail = failure.detail.as_deref().unwrap_or(""),
            "{}",
            failure.status_message
        );
    }

    fn unattributed(&self, failure: &ApiFailure) {
        warn!(
            error_code = %failure.error_code,
            "API failure: {}",
            failure.error_message
        );
    }
}

/// Both record streams as written to a report file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub attributed: Vec<AttributedFailure>,
    pub unattributed: Vec<ApiFailure>,
}

impl FailureReport {
    pub fn is_empty(&self) -> bool {
        self.attributed.is_empty() && self.unattributed.is_empty()
    }
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    records: Mutex<FailureReport>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributed_records(&self) -> Vec<AttributedFailure> {
        self.records.lock().attributed.clone()
    }

    pub fn unattributed_records(&self) -> Vec<ApiFailure> {
        self.records.lock().unattributed.clone()
    }

    pub fn report(&self) -> FailureReport {
        self.records.lock().clone()
    }
}

impl LogSink for MemoryLogSink {
    fn attributed(&self, failure: &AttributedFailure) {
        self.records.lock().attributed.push(failure.clone());
    }

    fn unattributed(&self, failure: &ApiFailure) {
        self.records.lock().unattributed.push(failure.clone());
    }
}

/// Forwards every record to several sinks in turn
pub struct FanoutLogSink {
    sinks: Vec<std::sync::Arc<dyn LogSink>>,
}

impl FanoutLogSink {
    pub fn new(sinks: Vec<std::sync::Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

impl LogSink for FanoutLogSink {
    fn attributed(&self, failure: &AttributedFailure) {
        for sink in &self.sinks {
            sink.attributed(failure);
        }
    }

    fn unattributed(&self, failure: &ApiFailure) {
        for sink in &self.sinks {
            sink.unattributed(failure);
        }
    }
}

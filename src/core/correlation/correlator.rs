//! Attribution of batch failures by elimination

use super::sink::{ApiFailure, AttributedFailure, LogSink};
use crate::core::batch::{BatchOperation, BatchOutcome};
use crate::core::models::LineItemKey;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

pub const PUSH_STATUS_MESSAGE: &str = "Failed to push to DV360. Please reprocess the row.";
pub const LOAD_STATUS_MESSAGE: &str = "Failed to load from DV360. Please reprocess the row.";

const CREATED_OPTIONS_FIELD: &str = "createdAssignedTargetingOptions";
const LISTED_OPTIONS_FIELD: &str = "assignedTargetingOptions";

/// Works out which operations of a chunk failed.
///
/// Neither error items nor success items reference their request. Every
/// success item names a created or listed resource, so the line items of the
/// chunk that no success item names are the ones that failed.
#[derive(Debug, Clone)]
pub struct ErrorCorrelator {
    resource_field: String,
    status_message: String,
}

impl ErrorCorrelator {
    pub fn new(resource_field: impl Into<String>, status_message: impl Into<String>) -> Self {
        Self {
            resource_field: resource_field.into(),
            status_message: status_message.into(),
        }
    }

    /// Correlator for bulk-edit chunks
    pub fn push() -> Self {
        Self::new(CREATED_OPTIONS_FIELD, PUSH_STATUS_MESSAGE)
    }

    /// Correlator for bulk-list chunks
    pub fn load() -> Self {
        Self::new(LISTED_OPTIONS_FIELD, LOAD_STATUS_MESSAGE)
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Key of the first resource named by a success item
    pub fn success_key(&self, item: &Value) -> Option<LineItemKey> {
        item.get(&self.resource_field)?
            .as_array()?
            .first()?
            .get("name")?
            .as_str()
            .and_then(LineItemKey::from_resource_path)
    }

    pub fn correlate(&self, operations: &[BatchOperation], outcome: &BatchOutcome) -> CorrelationReport {
        let succeeded: HashSet<LineItemKey> = outcome
            .success
            .iter()
            .filter_map(|item| self.success_key(item))
            .collect();

        let mut seen = HashSet::new();
        let failed_keys: Vec<LineItemKey> = operations
            .iter()
            .filter_map(BatchOperation::key)
            .filter(|key| seen.insert(key.clone()))
            .filter(|key| !succeeded.contains(key))
            .collect();

        let mut report = CorrelationReport {
            succeeded_keys: succeeded,
            ..Default::default()
        };

        for key in &failed_keys {
            let Some(operation) = operations.iter().find(|op| op.key().as_ref() == Some(key)) else {
                continue;
            };
            let detail = outcome
                .errors
                .iter()
                .find(|error| error.line_item_key().as_ref() == Some(key))
                .map(|error| error.message.clone());

            debug!(key = %key, url = operation.url(), "Attributed failed operation");
            report.attributed.push(AttributedFailure {
                advertiser_id: key.advertiser_id.to_string(),
                line_item_id: key.line_item_id.to_string(),
                status_message: self.status_message.clone(),
                detail,
            });
        }

        // Every error item keeps its code, even when its message also became
        // the detail of an attributed failure.
        for error in &outcome.errors {
            report.unattributed.push(ApiFailure {
                error_code: error.code_text(),
                error_message: error.message.clone(),
            });
        }

        report.failed_keys = failed_keys;
        report
    }
}

/// Failures found in one chunk
#[derive(Debug, Clone, Default)]
pub struct CorrelationReport {
    pub attributed: Vec<AttributedFailure>,
    pub unattributed: Vec<ApiFailure>,
    /// Keys of the chunk's operations that no success item named, in
    /// submission order
    pub failed_keys: Vec<LineItemKey>,
    pub succeeded_keys: HashSet<LineItemKey>,
}

impl CorrelationReport {
    pub fn is_clean(&self) -> bool {
        self.attributed.is_empty() && self.unattributed.is_empty()
    }

    pub fn has_failed(&self, key: &LineItemKey) -> bool {
        self.failed_keys.contains(key)
    }

    pub fn emit(&self, sink: &dyn LogSink) {
        for failure in &self.attributed {
            sink.attributed(failure);
        }
        for failure in &self.unattributed {
            sink.unattributed(failure);
        }
    }
}

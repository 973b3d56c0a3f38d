//! Bulk-edit request body

use crate::core::models::{AssignedTargetingOption, TargetingType};
use serde::{Deserialize, Serialize};

/// Body of a `bulkEditLineItemAssignedTargetingOptions` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEditPayload {
    pub create_requests: Vec<CreateAssignedTargetingOptionsRequest>,
}

/// All creations of one targeting type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignedTargetingOptionsRequest {
    pub targeting_type: TargetingType,
    pub assigned_targeting_options: Vec<AssignedTargetingOption>,
}

impl BulkEditPayload {
    pub fn option_count(&self) -> usize {
        self.create_requests
            .iter()
            .map(|r| r.assigned_targeting_options.len())
            .sum()
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

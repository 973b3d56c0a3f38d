//! Batch operation builders for line item targeting

use crate::core::batch::{BatchOperation, HttpMethod};
use crate::core::diff::BulkEditPayload;
use crate::core::models::{LineItemKey, TargetingType};
use crate::utils::error::{Result, SyncError};
use crate::utils::net::ClientUtils;
use url::Url;

fn line_item_action_url(base_url: &str, key: &LineItemKey, action: &str) -> Result<Url> {
    let path = format!(
        "advertisers/{}/lineItems/{}:{}",
        key.advertiser_id, key.line_item_id, action
    );
    Url::parse(&ClientUtils::add_path_to_api_base(base_url, &path))
        .map_err(|e| SyncError::config(format!("Invalid platform URL: {}", e)))
}

/// `targetingType="A" OR targetingType="B"`
pub fn targeting_type_filter(types: &[TargetingType]) -> String {
    types
        .iter()
        .map(|t| format!("targetingType=\"{}\"", t.as_str()))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// List every assigned option of the given types on one line item
pub fn bulk_list_request(
    base_url: &str,
    key: &LineItemKey,
    types: &[TargetingType],
) -> Result<BatchOperation> {
    let mut url = line_item_action_url(base_url, key, "bulkListLineItemAssignedTargetingOptions")?;
    if !types.is_empty() {
        url.query_pairs_mut()
            .append_pair("filter", &targeting_type_filter(types));
    }
    Ok(BatchOperation::new(HttpMethod::Get, url.as_str()))
}

/// Create the payload's options on one line item
pub fn bulk_edit_request(
    base_url: &str,
    key: &LineItemKey,
    payload: &BulkEditPayload,
) -> Result<BatchOperation> {
    let url = line_item_action_url(base_url, key, "bulkEditLineItemAssignedTargetingOptions")?;
    Ok(BatchOperation::with_payload(
        HttpMethod::Post,
        url.as_str(),
        serde_json::to_value(payload)?,
    ))
}

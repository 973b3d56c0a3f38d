//! Platform entity resources

use crate::core::models::{AdvertiserId, InsertionOrderId, LineItemId, LineItemKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Line item resource. Fields the sync does not read are kept verbatim so a
/// fetched line item can be patched back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub advertiser_id: AdvertiserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion_order_id: Option<InsertionOrderId>,
    pub line_item_id: LineItemId,
    #[serde(default)]
    pub display_name: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl LineItem {
    pub fn key(&self) -> LineItemKey {
        LineItemKey {
            advertiser_id: self.advertiser_id.clone(),
            line_item_id: self.line_item_id.clone(),
        }
    }
}

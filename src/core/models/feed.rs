//! Feed rows and the desired state parsed from them

use super::ids::{AdvertiserId, InsertionOrderId, LineItemId, LineItemKey};
use super::targeting::TargetingColumn;
use crate::utils::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ADVERTISER_ID_HEADER: &str = "Advertiser ID";
pub const INSERTION_ORDER_ID_HEADER: &str = "Insertion Order ID";
pub const LINE_ITEM_ID_HEADER: &str = "Line Item ID";
pub const LINE_ITEM_NAME_HEADER: &str = "Line Item Name";
pub const STATUS_HEADER: &str = "Status";

/// One tabular row of the feed, header → cell text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedRow(BTreeMap<String, String>);

impl FeedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(header, value);
        self
    }

    pub fn set(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.0.insert(header.into(), value.into());
    }

    /// Cell text, empty when the column is absent
    pub fn cell(&self, header: &str) -> &str {
        self.0.get(header).map(String::as_str).unwrap_or("")
    }

    fn id_cell(&self, header: &str) -> Option<&str> {
        let value = self.cell(header).trim();
        (!value.is_empty()).then_some(value)
    }

    pub fn advertiser_id(&self) -> Option<AdvertiserId> {
        self.id_cell(ADVERTISER_ID_HEADER).map(AdvertiserId::from)
    }

    pub fn insertion_order_id(&self) -> Option<InsertionOrderId> {
        self.id_cell(INSERTION_ORDER_ID_HEADER)
            .map(InsertionOrderId::from)
    }

    pub fn line_item_id(&self) -> Option<LineItemId> {
        self.id_cell(LINE_ITEM_ID_HEADER).map(LineItemId::from)
    }

    pub fn line_item_key(&self) -> Option<LineItemKey> {
        Some(LineItemKey {
            advertiser_id: self.advertiser_id()?,
            line_item_id: self.line_item_id()?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FeedRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parse a feed serialized as a JSON array of objects.
///
/// Numeric and boolean cells are rendered as text; null cells become blank.
pub fn parse_feed(json: &str) -> Result<Vec<FeedRow>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let rows = value
        .as_array()
        .ok_or_else(|| SyncError::parsing("Feed must be a JSON array of objects"))?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let object = row.as_object().ok_or_else(|| {
                SyncError::parsing(format!("Feed row {} is not an object", index + 1))
            })?;
            Ok(object
                .iter()
                .map(|(header, cell)| {
                    let text = match cell {
                        serde_json::Value::String(s) => s.clone(),
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (header.clone(), text)
                })
                .collect())
        })
        .collect()
}

/// Split a comma-joined cell into its entries.
///
/// Entries are trimmed, blanks are dropped and duplicates keep their first
/// position, so a blank cell yields an empty list rather than `[""]`.
pub fn split_cell(cell: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for entry in cell.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if !values.iter().any(|v| v == entry) {
            values.push(entry.to_string());
        }
    }
    values
}

/// Desired targeting of one line item, as requested by a feed row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    pub keyword_inclusions: Vec<String>,
    pub keyword_exclusions: Vec<String>,
    pub sensitive_categories: Vec<String>,
}

impl DesiredState {
    pub fn from_row(row: &FeedRow) -> Self {
        Self {
            keyword_inclusions: split_cell(row.cell(TargetingColumn::KeywordInclusions.header())),
            keyword_exclusions: split_cell(row.cell(TargetingColumn::KeywordExclusions.header())),
            sensitive_categories: split_cell(
                row.cell(TargetingColumn::SensitiveCategoryExclusions.header()),
            ),
        }
    }

    pub fn values(&self, column: TargetingColumn) -> &[String] {
        match column {
            TargetingColumn::KeywordInclusions => &self.keyword_inclusions,
            TargetingColumn::KeywordExclusions => &self.keyword_exclusions,
            TargetingColumn::SensitiveCategoryExclusions => &self.sensitive_categories,
        }
    }

    /// Append values of `other` not already present, column by column
    pub fn merge(&mut self, other: DesiredState) {
        for (mine, theirs) in [
            (&mut self.keyword_inclusions, other.keyword_inclusions),
            (&mut self.keyword_exclusions, other.keyword_exclusions),
            (&mut self.sensitive_categories, other.sensitive_categories),
        ] {
            for value in theirs {
                if !mine.contains(&value) {
                    mine.push(value);
                }
            }
        }
    }
}

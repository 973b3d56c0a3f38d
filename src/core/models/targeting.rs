//! Targeting types, assigned option resources and per-line-item snapshots

use super::ids::LineItemKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Targeting types the sync engine knows how to reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetingType {
    #[serde(rename = "TARGETING_TYPE_KEYWORD")]
    Keyword,
    #[serde(rename = "TARGETING_TYPE_SENSITIVE_CATEGORY_EXCLUSION")]
    SensitiveCategoryExclusion,
}

impl TargetingType {
    pub const ALL: [TargetingType; 2] = [Self::Keyword, Self::SensitiveCategoryExclusion];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "TARGETING_TYPE_KEYWORD",
            Self::SensitiveCategoryExclusion => "TARGETING_TYPE_SENSITIVE_CATEGORY_EXCLUSION",
        }
    }

    /// Feed columns carrying desired values for this type, in payload order
    pub fn columns(&self) -> &'static [TargetingColumn] {
        match self {
            Self::Keyword => &[
                TargetingColumn::KeywordInclusions,
                TargetingColumn::KeywordExclusions,
            ],
            Self::SensitiveCategoryExclusion => &[TargetingColumn::SensitiveCategoryExclusions],
        }
    }
}

impl fmt::Display for TargetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unsupported targeting type: {}", s))
    }
}

/// One type/polarity partition of targeting state, backed by one feed column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetingColumn {
    KeywordInclusions,
    KeywordExclusions,
    SensitiveCategoryExclusions,
}

impl TargetingColumn {
    pub const ALL: [TargetingColumn; 3] = [
        Self::KeywordInclusions,
        Self::KeywordExclusions,
        Self::SensitiveCategoryExclusions,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Self::KeywordInclusions => "Keyword Inclusions",
            Self::KeywordExclusions => "Keyword Exclusions",
            Self::SensitiveCategoryExclusions => "Sensitive Category Exclusions",
        }
    }

    /// Header of the read-only column echoing the remote state in reports
    pub fn original_header(&self) -> &'static str {
        match self {
            Self::KeywordInclusions => "Original Keyword Inclusions",
            Self::KeywordExclusions => "Original Keyword Exclusions",
            Self::SensitiveCategoryExclusions => "Original Sensitive Category Exclusions",
        }
    }

    pub fn targeting_type(&self) -> TargetingType {
        match self {
            Self::KeywordInclusions | Self::KeywordExclusions => TargetingType::Keyword,
            Self::SensitiveCategoryExclusions => TargetingType::SensitiveCategoryExclusion,
        }
    }
}

/// A concrete targeting rule to attach to a line item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetingOption {
    Keyword { text: String, negative: bool },
    SensitiveCategoryExclusion { category: String, remote_option_id: String },
}

impl TargetingOption {
    pub fn targeting_type(&self) -> TargetingType {
        match self {
            Self::Keyword { .. } => TargetingType::Keyword,
            Self::SensitiveCategoryExclusion { .. } => TargetingType::SensitiveCategoryExclusion,
        }
    }

    pub fn column(&self) -> TargetingColumn {
        match self {
            Self::Keyword { negative: false, .. } => TargetingColumn::KeywordInclusions,
            Self::Keyword { negative: true, .. } => TargetingColumn::KeywordExclusions,
            Self::SensitiveCategoryExclusion { .. } => TargetingColumn::SensitiveCategoryExclusions,
        }
    }

    /// Value as it appears in a snapshot or feed cell
    pub fn value(&self) -> &str {
        match self {
            Self::Keyword { text, .. } => text,
            Self::SensitiveCategoryExclusion { category, .. } => category,
        }
    }

    /// Wire form used inside a bulk-edit create request
    pub fn to_resource(&self) -> AssignedTargetingOption {
        match self {
            Self::Keyword { text, negative } => AssignedTargetingOption {
                keyword_details: Some(KeywordDetails {
                    keyword: text.clone(),
                    negative: *negative,
                }),
                ..Default::default()
            },
            Self::SensitiveCategoryExclusion {
                category,
                remote_option_id,
            } => AssignedTargetingOption {
                sensitive_category_exclusion_details: Some(SensitiveCategoryExclusionDetails {
                    excluded_targeting_option_id: Some(remote_option_id.clone()),
                    sensitive_category: Some(category.clone()),
                }),
                ..Default::default()
            },
        }
    }
}

/// Assigned targeting option resource as exchanged with the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTargetingOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeting_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_details: Option<KeywordDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitive_category_exclusion_details: Option<SensitiveCategoryExclusionDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDetails {
    pub keyword: String,
    #[serde(default)]
    pub negative: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitiveCategoryExclusionDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_targeting_option_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitive_category: Option<String>,
}

/// Current remote targeting of one line item, partitioned by type/polarity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedTargetingSnapshot {
    pub keyword_inclusions: Vec<String>,
    pub keyword_exclusions: Vec<String>,
    pub sensitive_categories: Vec<String>,
}

impl AssignedTargetingSnapshot {
    pub fn values(&self, column: TargetingColumn) -> &[String] {
        match column {
            TargetingColumn::KeywordInclusions => &self.keyword_inclusions,
            TargetingColumn::KeywordExclusions => &self.keyword_exclusions,
            TargetingColumn::SensitiveCategoryExclusions => &self.sensitive_categories,
        }
    }

    /// Record a value, normalized like a feed cell entry: trimmed, blanks
    /// and duplicates ignored
    pub fn insert(&mut self, column: TargetingColumn, value: impl Into<String>) {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return;
        }
        let values = match column {
            TargetingColumn::KeywordInclusions => &mut self.keyword_inclusions,
            TargetingColumn::KeywordExclusions => &mut self.keyword_exclusions,
            TargetingColumn::SensitiveCategoryExclusions => &mut self.sensitive_categories,
        };
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// Fold one assigned option into the snapshot. Options of unsupported
    /// types are ignored.
    pub fn absorb(&mut self, option: &AssignedTargetingOption) {
        if let Some(details) = &option.keyword_details {
            let column = if details.negative {
                TargetingColumn::KeywordExclusions
            } else {
                TargetingColumn::KeywordInclusions
            };
            self.insert(column, details.keyword.clone());
        } else if let Some(category) = option
            .sensitive_category_exclusion_details
            .as_ref()
            .and_then(|d| d.sensitive_category.clone())
        {
            self.insert(TargetingColumn::SensitiveCategoryExclusions, category);
        }
    }

    pub fn is_empty(&self) -> bool {
        TargetingColumn::ALL.iter().all(|c| self.values(*c).is_empty())
    }
}

/// Snapshots for many line items, filled from bulk-list responses
#[derive(Debug, Clone, Default)]
pub struct SnapshotSet {
    snapshots: HashMap<LineItemKey, AssignedTargetingSnapshot>,
}

impl SnapshotSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a bulk-list success item into the set.
    ///
    /// Each option is attributed through the line item key embedded in its
    /// resource name. Returns the number of options absorbed.
    pub fn absorb_response(&mut self, response: &serde_json::Value) -> usize {
        let Some(options) = response
            .get("assignedTargetingOptions")
            .and_then(|v| v.as_array())
        else {
            return 0;
        };

        let mut absorbed = 0;
        for raw in options {
            let option: AssignedTargetingOption = match serde_json::from_value(raw.clone()) {
                Ok(option) => option,
                Err(e) => {
                    debug!("Skipping unreadable assigned targeting option: {}", e);
                    continue;
                }
            };
            let Some(key) = option
                .name
                .as_deref()
                .and_then(LineItemKey::from_resource_path)
            else {
                continue;
            };
            self.snapshots.entry(key).or_default().absorb(&option);
            absorbed += 1;
        }
        absorbed
    }

    pub fn insert(&mut self, key: LineItemKey, snapshot: AssignedTargetingSnapshot) {
        self.snapshots.insert(key, snapshot);
    }

    /// Make sure a line item has an entry, empty if nothing was absorbed
    pub fn ensure(&mut self, key: LineItemKey) {
        self.snapshots.entry(key).or_default();
    }

    pub fn get(&self, key: &LineItemKey) -> Option<&AssignedTargetingSnapshot> {
        self.snapshots.get(key)
    }

    pub fn contains(&self, key: &LineItemKey) -> bool {
        self.snapshots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Per-advertiser table mapping a sensitive category to its remote option id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLookup {
    by_category: HashMap<String, String>,
}

impl CategoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup built from a single catalogue page
    pub fn from_catalogue(page: &serde_json::Value) -> Self {
        let mut lookup = Self::new();
        lookup.absorb_catalogue_page(page);
        lookup
    }

    /// Absorb one page of the advertiser's targeting option catalogue
    pub fn absorb_catalogue_page(&mut self, page: &serde_json::Value) {
        if let Some(options) = page.get("targetingOptions").and_then(|v| v.as_array()) {
            self.absorb_options(options);
        }
    }

    /// Absorb catalogue entries; entries without a category are ignored
    pub fn absorb_options(&mut self, options: &[serde_json::Value]) {
        for option in options {
            let id = option.get("targetingOptionId").and_then(|v| v.as_str());
            let category = option
                .pointer("/sensitiveCategoryDetails/sensitiveCategory")
                .and_then(|v| v.as_str());
            if let (Some(id), Some(category)) = (id, category) {
                self.by_category.insert(category.to_string(), id.to_string());
            }
        }
    }

    pub fn insert(&mut self, category: impl Into<String>, option_id: impl Into<String>) {
        self.by_category.insert(category.into(), option_id.into());
    }

    pub fn option_id(&self, category: &str) -> Option<&str> {
        self.by_category.get(category).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_category.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CategoryLookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            by_category: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

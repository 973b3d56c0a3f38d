//! Additive targeting diff

use super::payload::{BulkEditPayload, CreateAssignedTargetingOptionsRequest};
use crate::core::models::{
    AssignedTargetingSnapshot, CategoryLookup, DesiredState, LineItemKey, TargetingColumn,
    TargetingOption, TargetingType,
};
use tracing::debug;

/// `desired \ current` with exact value equality, in desired order.
///
/// Duplicates in `desired` are emitted once.
pub fn additive_diff(current: &[String], desired: &[String]) -> Vec<String> {
    let mut additions: Vec<String> = Vec::new();
    for value in desired {
        if !current.contains(value) && !additions.contains(value) {
            additions.push(value.clone());
        }
    }
    additions
}

/// Computes the creations that make remote targeting a superset of the
/// desired targeting. Remote-only entries are never touched.
#[derive(Debug, Clone)]
pub struct TargetingDiffEngine {
    enabled: Vec<TargetingType>,
}

impl Default for TargetingDiffEngine {
    fn default() -> Self {
        Self::new(TargetingType::ALL.to_vec())
    }
}

impl TargetingDiffEngine {
    pub fn new(enabled: Vec<TargetingType>) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> &[TargetingType] {
        &self.enabled
    }

    pub fn is_enabled(&self, targeting_type: TargetingType) -> bool {
        self.enabled.contains(&targeting_type)
    }

    /// Diff one line item.
    ///
    /// Categories missing from `categories` are skipped and reported in
    /// [`LineItemDiff::skipped_categories`]; with no lookup at all every new
    /// category is skipped.
    pub fn diff(
        &self,
        key: LineItemKey,
        current: &AssignedTargetingSnapshot,
        desired: &DesiredState,
        categories: Option<&CategoryLookup>,
    ) -> LineItemDiff {
        let mut result = LineItemDiff {
            key,
            additions: Vec::new(),
            skipped_categories: Vec::new(),
        };

        for targeting_type in TargetingType::ALL {
            if !self.is_enabled(targeting_type) {
                continue;
            }
            for column in targeting_type.columns() {
                let missing = additive_diff(current.values(*column), desired.values(*column));
                for value in missing {
                    match column {
                        TargetingColumn::KeywordInclusions | TargetingColumn::KeywordExclusions => {
                            result.additions.push(TargetingOption::Keyword {
                                text: value,
                                negative: *column == TargetingColumn::KeywordExclusions,
                            });
                        }
                        TargetingColumn::SensitiveCategoryExclusions => {
                            match categories.and_then(|lookup| lookup.option_id(&value)) {
                                Some(option_id) => {
                                    result.additions.push(TargetingOption::SensitiveCategoryExclusion {
                                        remote_option_id: option_id.to_string(),
                                        category: value,
                                    });
                                }
                                None => {
                                    debug!(key = %result.key, category = %value, "No remote option for sensitive category, skipping");
                                    result.skipped_categories.push(value);
                                }
                            }
                        }
                    }
                }
            }
        }

        result
    }
}

/// Creations needed for one line item, keyword inclusions first, then
/// exclusions, then categories in feed order
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDiff {
    pub key: LineItemKey,
    pub additions: Vec<TargetingOption>,
    pub skipped_categories: Vec<String>,
}

impl LineItemDiff {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.additions.len()
    }

    /// Additions grouped by targeting type; `None` when there is nothing to
    /// create, in which case no call must be made.
    pub fn to_payload(&self) -> Option<BulkEditPayload> {
        if self.is_empty() {
            return None;
        }

        let create_requests = TargetingType::ALL
            .into_iter()
            .filter_map(|targeting_type| {
                let options: Vec<_> = self
                    .additions
                    .iter()
                    .filter(|option| option.targeting_type() == targeting_type)
                    .map(TargetingOption::to_resource)
                    .collect();
                (!options.is_empty()).then_some(CreateAssignedTargetingOptionsRequest {
                    targeting_type,
                    assigned_targeting_options: options,
                })
            })
            .collect();

        Some(BulkEditPayload { create_requests })
    }

    /// Snapshot as it would read once every addition is applied
    pub fn apply(&self, current: &AssignedTargetingSnapshot) -> AssignedTargetingSnapshot {
        let mut next = current.clone();
        for option in &self.additions {
            next.insert(option.column(), option.value());
        }
        next
    }
}

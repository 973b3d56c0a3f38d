//! Core data models
//!
//! Entity identifiers, targeting state and feed rows.

pub mod feed;
pub mod ids;
pub mod targeting;

pub use feed::{DesiredState, FeedRow, parse_feed, split_cell};
pub use ids::{AdvertiserId, InsertionOrderId, LineItemId, LineItemKey};
pub use targeting::{
    AssignedTargetingOption, AssignedTargetingSnapshot, CategoryLookup, KeywordDetails,
    SensitiveCategoryExclusionDetails, SnapshotSet, TargetingColumn, TargetingOption,
    TargetingType,
};

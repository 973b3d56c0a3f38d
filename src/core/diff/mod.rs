//! Targeting reconciliation
//!
//! Turns current and desired targeting into bulk-edit payloads. The diff is
//! additive: it only ever creates options.

mod engine;
mod payload;


pub use engine::{LineItemDiff, TargetingDiffEngine, additive_diff};
pub use payload::{BulkEditPayload, CreateAssignedTargetingOptionsRequest};

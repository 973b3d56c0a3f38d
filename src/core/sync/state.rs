//! Current targeting state, loaded through the batch endpoint

use super::context::JobContext;
use super::summary::SyncSummary;
use crate::core::batch::execute_all;
use crate::core::correlation::ErrorCorrelator;
use crate::core::models::{LineItemKey, SnapshotSet};
use crate::core::platform::bulk_list_request;
use crate::utils::error::Result;
use std::collections::HashSet;
use tracing::{debug, info};

/// Snapshots of the line items that loaded, plus the ones that did not
#[derive(Debug, Default)]
pub struct StateLoad {
    pub snapshots: SnapshotSet,
    pub failed: HashSet<LineItemKey>,
    pub cancelled: bool,
}

/// Bulk-list the enabled targeting types of every line item in `keys`.
///
/// A line item that no success item mentions has no targeting of those types
/// when its chunk reported no errors. In a chunk with errors it cannot be
/// told apart from a failed call, so it is attributed as a load failure and
/// left out of the snapshots.
pub async fn load_current_state(
    ctx: &JobContext,
    keys: &[LineItemKey],
    summary: &mut SyncSummary,
) -> Result<StateLoad> {
    let operations = keys
        .iter()
        .map(|key| bulk_list_request(ctx.platform.base_url(), key, &ctx.targeting_types))
        .collect::<Result<Vec<_>>>()?;

    info!(line_items = operations.len(), "Loading current targeting");
    let run = execute_all(
        ctx.executor.as_ref(),
        &ctx.builder,
        operations,
        ctx.checkpoint.as_ref(),
    )
    .await?;
    summary.record_run(&run);

    let correlator = ErrorCorrelator::load();
    let mut load = StateLoad {
        cancelled: run.cancelled,
        ..Default::default()
    };

    for chunk in &run.chunks {
        for item in &chunk.outcome.success {
            let absorbed = load.snapshots.absorb_response(item);
            debug!(absorbed, "Absorbed assigned targeting options");
        }

        if chunk.outcome.has_errors() {
            let report = correlator.correlate(&chunk.operations, &chunk.outcome);
            report.emit(ctx.sink.as_ref());
            summary.record_report(&report);
            load.failed.extend(report.failed_keys);
        }

        for key in chunk.operations.iter().filter_map(|op| op.key()) {
            if !load.failed.contains(&key) {
                load.snapshots.ensure(key);
            }
        }
    }

    Ok(load)
}

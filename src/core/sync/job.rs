//! Load and push jobs

use super::context::JobContext;
use super::registry::{EntityType, LoaderRegistry};
use super::state::load_current_state;
use super::summary::SyncSummary;
use crate::core::batch::execute_all;
use crate::core::correlation::ErrorCorrelator;
use crate::core::diff::TargetingDiffEngine;
use crate::core::models::{
    AdvertiserId, CategoryLookup, DesiredState, FeedRow, LineItemKey, TargetingColumn,
    TargetingType,
};
use crate::core::platform::bulk_edit_request;
use crate::utils::error::Result;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Rows rendered back from a load
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub rows: Vec<FeedRow>,
    pub summary: SyncSummary,
}

/// One run of the sync against the remote platform
pub struct SyncJob {
    ctx: JobContext,
    registry: LoaderRegistry,
    engine: TargetingDiffEngine,
}

impl SyncJob {
    pub fn new(ctx: JobContext, registry: LoaderRegistry) -> Self {
        let engine = TargetingDiffEngine::new(ctx.targeting_types.clone());
        Self {
            ctx,
            registry,
            engine,
        }
    }

    pub fn context(&self) -> &JobContext {
        &self.ctx
    }

    /// Read the current targeting of the line items `rows` point at
    pub async fn load(&self, entity: EntityType, rows: &[FeedRow]) -> Result<LoadReport> {
        let loader = self.registry.loader(entity)?;
        let mut summary = SyncSummary::start("load");
        summary.rows = rows.len();

        info!(entity = %entity, rows = rows.len(), "Starting load");
        let result = loader.identify(rows, &self.ctx, &mut summary).await?;
        summary.line_items = result.items.len();
        summary.cancelled |= result.cancelled;

        let rows = result.items.iter().map(|item| item.to_report_row()).collect();
        let summary = summary.finish();
        info!(
            line_items = summary.line_items,
            failures = summary.failures(),
            cancelled = summary.cancelled,
            "Load finished"
        );
        Ok(LoadReport { rows, summary })
    }

    /// Add every desired option missing from the remote line items
    pub async fn push(&self, rows: &[FeedRow]) -> Result<SyncSummary> {
        let mut summary = SyncSummary::start("push");
        summary.rows = rows.len();
        info!(rows = rows.len(), "Starting push");

        let desired = collect_desired(rows, &mut summary);
        summary.line_items = desired.len();
        if desired.is_empty() {
            return Ok(summary.finish());
        }

        let Some(lookups) = self.category_lookups(&desired).await? else {
            summary.cancelled = true;
            return Ok(summary.finish());
        };

        let keys: Vec<_> = desired.iter().map(|(key, _)| key.clone()).collect();
        let state = load_current_state(&self.ctx, &keys, &mut summary).await?;
        if state.cancelled {
            return Ok(summary.finish());
        }

        let mut operations = Vec::new();
        for (key, wanted) in &desired {
            let Some(current) = state.snapshots.get(key) else {
                debug!(key = %key, "No current state, not pushing");
                continue;
            };
            let diff = self
                .engine
                .diff(key.clone(), current, wanted, lookups.get(&key.advertiser_id));
            summary.skipped_categories += diff.skipped_categories.len();

            match diff.to_payload() {
                Some(payload) => operations.push(bulk_edit_request(
                    self.ctx.platform.base_url(),
                    key,
                    &payload,
                )?),
                None => summary.empty_diffs += 1,
            }
        }

        info!(operations = operations.len(), "Pushing targeting changes");
        let run = execute_all(
            self.ctx.executor.as_ref(),
            &self.ctx.builder,
            operations,
            self.ctx.checkpoint.as_ref(),
        )
        .await?;
        summary.record_run(&run);

        let correlator = ErrorCorrelator::push();
        for chunk in run.chunks.iter().filter(|c| c.outcome.has_errors()) {
            let report = correlator.correlate(&chunk.operations, &chunk.outcome);
            report.emit(self.ctx.sink.as_ref());
            summary.record_report(&report);
        }

        let summary = summary.finish();
        info!(
            operations = summary.operations,
            successes = summary.successes,
            failures = summary.failures(),
            empty_diffs = summary.empty_diffs,
            cancelled = summary.cancelled,
            "Push finished"
        );
        Ok(summary)
    }

    /// Category tables for every advertiser with category work, built once
    /// before any line item is touched. `None` when the checkpoint stopped
    /// the job.
    async fn category_lookups(
        &self,
        desired: &[(LineItemKey, DesiredState)],
    ) -> Result<Option<HashMap<AdvertiserId, CategoryLookup>>> {
        let mut lookups = HashMap::new();
        if !self.engine.is_enabled(TargetingType::SensitiveCategoryExclusion) {
            return Ok(Some(lookups));
        }

        for (key, wanted) in desired {
            let advertiser_id = &key.advertiser_id;
            if lookups.contains_key(advertiser_id)
                || wanted
                    .values(TargetingColumn::SensitiveCategoryExclusions)
                    .is_empty()
            {
                continue;
            }
            if !self.ctx.should_continue() {
                warn!("Execution budget exhausted while reading category catalogues");
                return Ok(None);
            }

            let options = self
                .ctx
                .platform
                .list_targeting_options(advertiser_id, TargetingType::SensitiveCategoryExclusion)
                .await?;
            let mut lookup = CategoryLookup::new();
            lookup.absorb_options(&options);
            debug!(advertiser_id = %advertiser_id, categories = lookup.len(), "Built category lookup");
            lookups.insert(advertiser_id.clone(), lookup);
        }

        Ok(Some(lookups))
    }
}

/// Desired state per line item in feed order. Rows naming the same line
/// item are merged so each line item gets at most one operation.
fn collect_desired(rows: &[FeedRow], summary: &mut SyncSummary) -> Vec<(LineItemKey, DesiredState)> {
    let mut desired: Vec<(LineItemKey, DesiredState)> = Vec::new();
    let mut positions: HashMap<LineItemKey, usize> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(key) = row.line_item_key() else {
            warn!(row = index + 1, "Row has no advertiser or line item id, skipping");
            summary.skipped_rows += 1;
            continue;
        };
        let state = DesiredState::from_row(row);

        match positions.get(&key) {
            Some(&position) => desired[position].1.merge(state),
            None => {
                positions.insert(key.clone(), desired.len());
                desired.push((key, state));
            }
        }
    }

    desired
}

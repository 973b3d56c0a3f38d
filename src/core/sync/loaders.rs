//! Entity loaders
//!
//! A loader turns feed rows into line items with their current targeting,
//! ready to be written back as a QA report.

use super::context::JobContext;
use super::registry::EntityType;
use super::state::load_current_state;
use super::summary::SyncSummary;
use crate::core::models::{
    AssignedTargetingSnapshot, FeedRow, TargetingColumn,
    feed::{
        ADVERTISER_ID_HEADER, INSERTION_ORDER_ID_HEADER, LINE_ITEM_ID_HEADER,
        LINE_ITEM_NAME_HEADER,
    },
};
use crate::core::platform::LineItem;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{info, warn};

/// A line item together with its current targeting
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLineItem {
    pub line_item: LineItem,
    pub snapshot: AssignedTargetingSnapshot,
}

impl LoadedLineItem {
    /// Report row: editable targeting columns prefilled with the current
    /// state, plus read-only `Original ...` copies
    pub fn to_report_row(&self) -> FeedRow {
        let mut row = FeedRow::new()
            .with(ADVERTISER_ID_HEADER, self.line_item.advertiser_id.as_str())
            .with(
                INSERTION_ORDER_ID_HEADER,
                self.line_item
                    .insertion_order_id
                    .as_ref()
                    .map(|id| id.as_str())
                    .unwrap_or_default(),
            )
            .with(LINE_ITEM_ID_HEADER, self.line_item.line_item_id.as_str())
            .with(LINE_ITEM_NAME_HEADER, self.line_item.display_name.as_str());

        for column in TargetingColumn::ALL {
            let joined = self.snapshot.values(column).join(",");
            row.set(column.header(), joined.clone());
            row.set(column.original_header(), joined);
        }
        row
    }
}

/// Line items found for a set of rows
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    pub items: Vec<LoadedLineItem>,
    pub cancelled: bool,
}

#[async_trait]
pub trait EntityLoader: Send + Sync {
    fn entity_type(&self) -> EntityType;

    async fn identify(
        &self,
        rows: &[FeedRow],
        ctx: &JobContext,
        summary: &mut SyncSummary,
    ) -> Result<LoadResult>;
}

/// Attach current targeting to already fetched line items
async fn attach_targeting(
    line_items: Vec<LineItem>,
    ctx: &JobContext,
    summary: &mut SyncSummary,
) -> Result<LoadResult> {
    let keys: Vec<_> = line_items.iter().map(LineItem::key).collect();
    let state = load_current_state(ctx, &keys, summary).await?;

    let items = line_items
        .into_iter()
        .filter_map(|line_item| {
            let snapshot = state.snapshots.get(&line_item.key())?.clone();
            Some(LoadedLineItem {
                line_item,
                snapshot,
            })
        })
        .collect();

    Ok(LoadResult {
        items,
        cancelled: state.cancelled,
    })
}

/// Rows name an advertiser and an insertion order; every line item of the
/// order is loaded
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionOrderLoader;

#[async_trait]
impl EntityLoader for InsertionOrderLoader {
    fn entity_type(&self) -> EntityType {
        EntityType::InsertionOrder
    }

    async fn identify(
        &self,
        rows: &[FeedRow],
        ctx: &JobContext,
        summary: &mut SyncSummary,
    ) -> Result<LoadResult> {
        let mut seen = HashSet::new();
        let mut line_items = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let (Some(advertiser_id), Some(insertion_order_id)) =
                (row.advertiser_id(), row.insertion_order_id())
            else {
                warn!(row = index + 1, "Row has no advertiser or insertion order id, skipping");
                summary.skipped_rows += 1;
                continue;
            };
            if !seen.insert((advertiser_id.clone(), insertion_order_id.clone())) {
                continue;
            }
            if !ctx.should_continue() {
                summary.cancelled = true;
                return Ok(LoadResult {
                    items: Vec::new(),
                    cancelled: true,
                });
            }

            let found = ctx
                .platform
                .list_line_items(&advertiser_id, &insertion_order_id)
                .await?;
            info!(
                advertiser_id = %advertiser_id,
                insertion_order_id = %insertion_order_id,
                line_items = found.len(),
                "Listed line items"
            );
            line_items.extend(found);
        }

        attach_targeting(line_items, ctx, summary).await
    }
}

/// Rows name an advertiser and a line item
#[derive(Debug, Clone, Copy, Default)]
pub struct LineItemLoader;

#[async_trait]
impl EntityLoader for LineItemLoader {
    fn entity_type(&self) -> EntityType {
        EntityType::LineItem
    }

    async fn identify(
        &self,
        rows: &[FeedRow],
        ctx: &JobContext,
        summary: &mut SyncSummary,
    ) -> Result<LoadResult> {
        let mut seen = HashSet::new();
        let mut line_items = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let Some(key) = row.line_item_key() else {
                warn!(row = index + 1, "Row has no advertiser or line item id, skipping");
                summary.skipped_rows += 1;
                continue;
            };
            if !seen.insert(key.clone()) {
                continue;
            }
            if !ctx.should_continue() {
                summary.cancelled = true;
                return Ok(LoadResult {
                    items: Vec::new(),
                    cancelled: true,
                });
            }

            let line_item = ctx
                .platform
                .get_line_item(&key.advertiser_id, &key.line_item_id)
                .await?;
            line_items.push(line_item);
        }

        attach_targeting(line_items, ctx, summary).await
    }
}

//! Job summary

use crate::core::batch::BatchRun;
use crate::core::correlation::CorrelationReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters and timestamps of one load or push run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub action: String,
    pub rows: usize,
    pub skipped_rows: usize,
    pub line_items: usize,
    pub operations: usize,
    pub chunks: usize,
    pub successes: usize,
    pub attributed_failures: usize,
    pub unattributed_failures: usize,
    pub empty_diffs: usize,
    pub skipped_categories: usize,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SyncSummary {
    pub fn start(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            rows: 0,
            skipped_rows: 0,
            line_items: 0,
            operations: 0,
            chunks: 0,
            successes: 0,
            attributed_failures: 0,
            unattributed_failures: 0,
            empty_diffs: 0,
            skipped_categories: 0,
            cancelled: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_run(&mut self, run: &BatchRun) {
        self.operations += run.operation_count();
        self.chunks += run.chunks.len();
        self.successes += run.success_count();
        self.cancelled |= run.cancelled;
    }

    pub fn record_report(&mut self, report: &CorrelationReport) {
        self.attributed_failures += report.attributed.len();
        self.unattributed_failures += report.unattributed.len();
    }

    pub fn failures(&self) -> usize {
        self.attributed_failures + self.unattributed_failures
    }

    /// No failures and every planned chunk was sent
    pub fn is_clean(&self) -> bool {
        self.failures() == 0 && !self.cancelled
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }
}

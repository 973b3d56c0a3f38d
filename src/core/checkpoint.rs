//! Cooperative cancellation points
//!
//! A job asks its checkpoint whether to keep going between advertisers and
//! between batch chunks. Nothing is ever interrupted mid-call.

use std::time::{Duration, Instant};

/// Answers "continue?" at the job's cancellation points
pub trait Checkpoint: Send + Sync {
    fn should_continue(&self) -> bool;
}

/// Wall-clock budget for one job
#[derive(Debug, Clone)]
pub struct ExecutionBudget {
    started: Instant,
    ceiling: Duration,
}

impl ExecutionBudget {
    pub fn new(ceiling: Duration) -> Self {
        Self {
            started: Instant::now(),
            ceiling,
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.ceiling.saturating_sub(self.elapsed())
    }
}

impl Checkpoint for ExecutionBudget {
    fn should_continue(&self) -> bool {
        self.elapsed() < self.ceiling
    }
}

/// Never asks the job to stop
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Checkpoint for Unbounded {
    fn should_continue(&self) -> bool {
        true
    }
}

/// Adapts a closure into a checkpoint
pub struct CheckpointFn<F>(pub F);

impl<F> Checkpoint for CheckpointFn<F>
where
    F: Fn() -> bool + Send + Sync,
{
    fn should_continue(&self) -> bool {
        (self.0)()
    }
}

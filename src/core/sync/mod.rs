//! Sync jobs
//!
//! Loading current targeting into report rows and pushing desired targeting
//! to the platform.

mod context;
mod job;
mod loaders;
mod registry;
mod state;
mod summary;


pub use context::JobContext;
pub use job::{LoadReport, SyncJob};
pub use loaders::{EntityLoader, InsertionOrderLoader, LineItemLoader, LoadResult, LoadedLineItem};
pub use registry::{EntityType, LoaderRegistry};
pub use state::{StateLoad, load_current_state};
pub use summary::SyncSummary;

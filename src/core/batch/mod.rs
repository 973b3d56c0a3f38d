//! Batched RPC execution
//!
//! Operations are chunked, framed as `multipart/mixed`, sent one chunk at a
//! time and decoded into classified success and error lists.

mod builder;
pub mod codec;
mod transport;
mod types;


pub use builder::BatchRequestBuilder;
pub use transport::{BatchExecutor, BatchRun, BatchTransport, ChunkResult, execute_all};
pub use types::{
    BatchItemError, BatchOperation, BatchOutcome, BatchResponseItem, HttpMethod, MAX_BATCH_SIZE,
};

//! Size-bounded chunking of batch operations

use super::types::{BatchOperation, MAX_BATCH_SIZE};
use crate::core::models::LineItemKey;
use std::collections::HashSet;

/// Splits an ordered operation list into chunks the platform will accept.
///
/// Global order is preserved and nothing is dropped or duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequestBuilder {
    chunk_size: usize,
}

impl Default for BatchRequestBuilder {
    fn default() -> Self {
        Self {
            chunk_size: MAX_BATCH_SIZE,
        }
    }
}

impl BatchRequestBuilder {
    /// Chunk size is clamped to `1..=MAX_BATCH_SIZE`
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.clamp(1, MAX_BATCH_SIZE),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks `len` items produce
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    pub fn chunk<T>(&self, items: Vec<T>) -> Vec<Vec<T>> {
        let mut chunks = Vec::with_capacity(self.chunk_count(items.len()));
        let mut current = Vec::with_capacity(self.chunk_size.min(items.len()));

        for item in items {
            current.push(item);
            if current.len() == self.chunk_size {
                chunks.push(std::mem::replace(
                    &mut current,
                    Vec::with_capacity(self.chunk_size),
                ));
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    /// Keys that appear on more than one operation of `chunk`.
    ///
    /// Error correlation assumes at most one operation per line item per
    /// chunk; any key returned here makes attribution ambiguous.
    pub fn duplicate_keys(chunk: &[BatchOperation]) -> Vec<LineItemKey> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for key in chunk.iter().filter_map(BatchOperation::key) {
            if !seen.insert(key.clone()) && !duplicates.contains(&key) {
                duplicates.push(key);
            }
        }
        duplicates
    }
}

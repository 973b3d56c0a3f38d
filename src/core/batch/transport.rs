//! Batch endpoint transport and sequential chunk driver

use super::builder::BatchRequestBuilder;
use super::codec;
use super::types::{BatchOperation, BatchOutcome, MAX_BATCH_SIZE};
use crate::config::PlatformConfig;
use crate::core::checkpoint::Checkpoint;
use crate::utils::error::{Result, SyncError};
use crate::utils::net::ClientUtils;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

/// Executes one chunk as a single outer call
#[async_trait]
pub trait BatchExecutor: Send + Sync {
    async fn execute(&self, chunk: &[BatchOperation]) -> Result<BatchOutcome>;
}

/// `multipart/mixed` transport for the platform's batch endpoint.
///
/// A non-success outer status fails the whole chunk. Nothing is retried at
/// this layer.
#[derive(Debug, Clone)]
pub struct BatchTransport {
    client: Client,
    batch_url: String,
    access_token: Option<String>,
}

impl BatchTransport {
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        Ok(Self {
            client: ClientUtils::create_http_client(config)?,
            batch_url: config.batch_url.clone(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn with_client(client: Client, batch_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            client,
            batch_url: batch_url.into(),
            access_token,
        }
    }

    pub fn batch_url(&self) -> &str {
        &self.batch_url
    }
}

#[async_trait]
impl BatchExecutor for BatchTransport {
    async fn execute(&self, chunk: &[BatchOperation]) -> Result<BatchOutcome> {
        if chunk.is_empty() {
            return Ok(BatchOutcome::default());
        }
        if chunk.len() > MAX_BATCH_SIZE {
            return Err(SyncError::invalid_request(format!(
                "Batch of {} operations exceeds the limit of {}",
                chunk.len(),
                MAX_BATCH_SIZE
            )));
        }

        let boundary = codec::new_boundary();
        let body = codec::encode(&boundary, chunk)?;

        let mut request = self
            .client
            .post(&self.batch_url)
            .header(CONTENT_TYPE, codec::content_type(&boundary))
            .body(body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        debug!(operations = chunk.len(), "Sending batch request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::api(status.as_u16(), message));
        }

        let header_boundary = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| ClientUtils::parse_content_type(v).1.remove("boundary"));
        let text = response.text().await?;

        let boundary = header_boundary
            .or_else(|| codec::boundary_from_body(&text))
            .ok_or_else(|| SyncError::parsing("Batch response carries no multipart boundary"))?;

        let outcome = codec::decode(&text, &boundary);
        debug!(
            successes = outcome.success.len(),
            errors = outcome.errors.len(),
            "Decoded batch response"
        );
        Ok(outcome)
    }
}

/// One executed chunk with the operations that produced it
#[derive(Debug, Clone)]
pub struct ChunkResult {
    pub operations: Vec<BatchOperation>,
    pub outcome: BatchOutcome,
}

/// Result of running a whole operation list
#[derive(Debug, Clone, Default)]
pub struct BatchRun {
    pub chunks: Vec<ChunkResult>,
    /// Set when the checkpoint stopped the run before every chunk was sent
    pub cancelled: bool,
}

impl BatchRun {
    pub fn operation_count(&self) -> usize {
        self.chunks.iter().map(|c| c.operations.len()).sum()
    }

    pub fn success_count(&self) -> usize {
        self.chunks.iter().map(|c| c.outcome.success.len()).sum()
    }

    pub fn error_count(&self) -> usize {
        self.chunks.iter().map(|c| c.outcome.errors.len()).sum()
    }
}

/// Chunk `operations` and execute the chunks strictly one after another.
///
/// The checkpoint is consulted before every chunk. An outer-call failure
/// aborts the run and is returned as is.
pub async fn execute_all(
    executor: &dyn BatchExecutor,
    builder: &BatchRequestBuilder,
    operations: Vec<BatchOperation>,
    checkpoint: &dyn Checkpoint,
) -> Result<BatchRun> {
    let chunks = builder.chunk(operations);
    let total = chunks.len();
    let mut run = BatchRun::default();

    for (index, chunk) in chunks.into_iter().enumerate() {
        if !checkpoint.should_continue() {
            warn!(chunk = index + 1, total, "Execution budget exhausted, stopping batch run");
            run.cancelled = true;
            break;
        }

        let duplicates = BatchRequestBuilder::duplicate_keys(&chunk);
        if !duplicates.is_empty() {
            warn!(
                chunk = index + 1,
                keys = ?duplicates.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "Several operations share a line item; failure attribution may be ambiguous"
            );
        }

        info!(chunk = index + 1, total, operations = chunk.len(), "Executing batch chunk");
        let outcome = executor.execute(&chunk).await?;
        run.chunks.push(ChunkResult {
            operations: chunk,
            outcome,
        });
    }

    Ok(run)
}

//! adsync - additive targeting sync for ad-serving line items
//!
//! Loads current line item targeting into a report, or pushes desired
//! targeting from a feed.

#![allow(missing_docs)]

use adsync::config::Config;
use adsync::core::correlation::{FanoutLogSink, LogSink, MemoryLogSink, TracingLogSink};
use adsync::core::models::{FeedRow, parse_feed};
use adsync::core::sync::{EntityType, JobContext, LoaderRegistry, SyncJob, SyncSummary};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "adsync", version, about = "Additive targeting sync for ad-serving line items")]
struct Cli {
    /// Configuration file; defaults and ADSYNC_* variables apply when omitted
    #[arg(long, global = true, env = "ADSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read current targeting into a QA report
    Load {
        /// Kind of rows in the feed
        #[arg(long, value_parser = parse_entity)]
        entity: EntityType,
        /// Feed file, a JSON array of row objects
        #[arg(long)]
        feed: PathBuf,
        /// Where to write the report rows
        #[arg(long)]
        out: PathBuf,
    },
    /// Add desired targeting missing from the remote line items
    Push {
        /// Feed file, a JSON array of row objects
        #[arg(long)]
        feed: PathBuf,
        /// Where to write the failure report
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn parse_entity(value: &str) -> std::result::Result<EntityType, String> {
    value.parse()
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Config::from_env().context("loading configuration from environment"),
    }
}

async fn read_feed(path: &Path) -> Result<Vec<FeedRow>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading feed {}", path.display()))?;
    parse_feed(&content).with_context(|| format!("parsing feed {}", path.display()))
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("writing {}", path.display()))
}

fn log_summary(summary: &SyncSummary) {
    info!(
        action = %summary.action,
        rows = summary.rows,
        line_items = summary.line_items,
        operations = summary.operations,
        chunks = summary.chunks,
        failures = summary.failures(),
        cancelled = summary.cancelled,
        duration_ms = summary.duration().map(|d| d.num_milliseconds()).unwrap_or_default(),
        "Job summary"
    );
}

async fn run(cli: Cli) -> Result<bool> {
    let build = adsync::build_info();
    debug!(version = build.version, git_hash = build.git_hash, "adsync starting");

    let config = load_config(cli.config.as_deref()).await?;
    let registry = LoaderRegistry::from_config(&config.job().entities);

    match cli.command {
        Command::Load { entity, feed, out } => {
            let rows = read_feed(&feed).await?;
            let ctx = JobContext::from_config(&config, Arc::new(TracingLogSink))?;
            let report = SyncJob::new(ctx, registry).load(entity, &rows).await?;

            write_json(&out, &report.rows).await?;
            info!(rows = report.rows.len(), out = %out.display(), "Report written");
            log_summary(&report.summary);
            Ok(report.summary.is_clean())
        }
        Command::Push { feed, report } => {
            let rows = read_feed(&feed).await?;
            let memory = Arc::new(MemoryLogSink::new());
            let sinks: Vec<Arc<dyn LogSink>> = vec![Arc::new(TracingLogSink), memory.clone()];
            let ctx = JobContext::from_config(&config, Arc::new(FanoutLogSink::new(sinks)))?;
            let summary = SyncJob::new(ctx, registry).push(&rows).await?;

            if let Some(path) = report {
                write_json(&path, &memory.report()).await?;
                info!(out = %path.display(), "Failure report written");
            }
            log_summary(&summary);
            Ok(summary.is_clean())
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

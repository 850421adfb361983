//! vulnsync Ingest - feed synchronization job

use anyhow::Result;
use clap::Parser;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use tracing::{info, warn};
use vulnsync_common::logging::{init_logging, LogConfig, LogLevel};
use vulnsync_ingest::config::SyncConfig;
use vulnsync_ingest::error::SyncError;
use vulnsync_ingest::nvd::FeedFetcher;
use vulnsync_ingest::orchestrator::{SyncOrchestrator, SyncReport};
use vulnsync_ingest::sink::{MemoryVulnerabilitySink, PgVulnerabilitySink};

#[derive(Parser, Debug)]
#[command(name = "vulnsync-ingest")]
#[command(author, version, about = "Vulnerability feed synchronization job")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Run one feed synchronization pass
    Sync {
        /// Records per chunk write (overrides VULNSYNC_CHUNK_SIZE)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Maximum in-flight chunk writes (overrides VULNSYNC_UPSERT_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Skip the database and write to an in-memory sink
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("vulnsync-ingest".to_string())
        .filter_directives("sqlx=warn,hyper=warn".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    match cli.command {
        Command::Sync {
            chunk_size,
            concurrency,
            dry_run,
        } => {
            let report = run_sync(chunk_size, concurrency, dry_run).await?;
            info!(
                records_merged = report.records_merged,
                records_written = report.records_written,
                chunks_failed = report.chunks_failed,
                "Sync run finished"
            );
        }
    }

    Ok(())
}

/// Run the pipeline; the returned error alone decides the exit status
///
/// Configuration, fetch, and decode errors bubble up and exit non-zero.
/// Chunk-write failures are reported inside the `SyncReport` and still
/// exit zero.
async fn run_sync(
    chunk_size: Option<usize>,
    concurrency: Option<usize>,
    dry_run: bool,
) -> Result<SyncReport> {
    let mut config = SyncConfig::from_env()?;
    if let Some(size) = chunk_size {
        config.chunk_size = size;
    }
    if let Some(limit) = concurrency {
        config.upsert_concurrency = limit;
    }
    config.validate()?;

    let fetcher = FeedFetcher::new()?;

    let report = if dry_run {
        info!("Dry run: writing to in-memory sink");
        let sink = MemoryVulnerabilitySink::new();
        SyncOrchestrator::new(config, fetcher, sink).run().await?
    } else {
        let options = PgConnectOptions::from_str(&config.database_url)
            .map_err(|e| SyncError::Config(format!("Invalid database URL: {}", e)))?
            .password(&config.database_password);

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await?;
        info!("Database connection pool established");

        sqlx::migrate!("../../migrations").run(&pool).await?;

        let sink = PgVulnerabilitySink::new(pool);
        SyncOrchestrator::new(config, fetcher, sink).run().await?
    };

    if report.chunks_failed > 0 {
        warn!(
            chunks_failed = report.chunks_failed,
            chunks_total = report.chunks_total,
            "Some chunk writes failed; affected records were not updated this run"
        );
    }

    Ok(report)
}

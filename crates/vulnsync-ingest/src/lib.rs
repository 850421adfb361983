//! vulnsync Ingest Library
//!
//! The feed-synchronization pipeline behind the vulnerability dashboard:
//! fetches the gzip-compressed NVD "recent" and "modified" feed snapshots,
//! merges them into one canonical record set, and upserts the result into
//! the store under bounded concurrency.
//!
//! # Pipeline
//!
//! Fetch -> Decode -> Merge -> Batch -> Bounded Upsert
//!
//! Fetch and decode failures abort the run before anything is written;
//! individual chunk-write failures are recorded in the [`orchestrator::SyncReport`]
//! but leave the run successful.
//!
//! # Example
//!
//! ```no_run
//! use vulnsync_ingest::config::SyncConfig;
//! use vulnsync_ingest::nvd::FeedFetcher;
//! use vulnsync_ingest::orchestrator::SyncOrchestrator;
//! use vulnsync_ingest::sink::MemoryVulnerabilitySink;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SyncConfig::from_env()?;
//!     let orchestrator =
//!         SyncOrchestrator::new(config, FeedFetcher::new()?, MemoryVulnerabilitySink::new());
//!     let report = orchestrator.run().await?;
//!     println!("wrote {} records", report.records_written);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod nvd;
pub mod orchestrator;
pub mod pool;
pub mod sink;

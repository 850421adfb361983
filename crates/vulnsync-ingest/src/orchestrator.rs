//! Pipeline orchestration
//!
//! Sequences fetch -> decode -> merge -> batch -> bounded upsert and
//! applies the failure policy: anything before batching is fatal and
//! aborts the run with nothing written; chunk-write failures are recorded
//! in the report but leave the run successful.

use std::time::Instant;
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::error::Result;
use crate::nvd::{batch_records, decode_feed, merge_feeds, FeedFetcher};
use crate::pool::UpsertPool;
use crate::sink::VulnerabilitySink;

/// Final status of one synchronization run
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub records_merged: usize,
    pub chunks_total: usize,
    pub chunks_failed: usize,
    pub records_written: usize,
    pub duration_seconds: f64,
}

/// Runs the feed synchronization pipeline against an injected sink
pub struct SyncOrchestrator<S> {
    config: SyncConfig,
    fetcher: FeedFetcher,
    sink: S,
}

impl<S: VulnerabilitySink> SyncOrchestrator<S> {
    pub fn new(config: SyncConfig, fetcher: FeedFetcher, sink: S) -> Self {
        Self {
            config,
            fetcher,
            sink,
        }
    }

    /// Execute one full synchronization run
    ///
    /// The second feed is fetched only after the first is fetched and
    /// decoded; there is no overlap between sources.
    pub async fn run(&self) -> Result<SyncReport> {
        let start = Instant::now();
        info!("Starting vulnerability feed sync");

        let recent_body = self.fetcher.fetch(&self.config.recent_feed_url).await?;
        let recent = decode_feed(&recent_body)?;

        let modified_body = self.fetcher.fetch(&self.config.modified_feed_url).await?;
        let modified = decode_feed(&modified_body)?;

        info!(
            recent = recent.items.len(),
            modified = modified.items.len(),
            "Feeds decoded"
        );

        // The modified feed is passed second: it wins on conflicting ids
        let records = merge_feeds(&recent.items, &modified.items);
        let records_merged = records.len();

        if records.is_empty() {
            info!("Merged record set is empty, nothing to write");
            return Ok(SyncReport {
                records_merged: 0,
                chunks_total: 0,
                chunks_failed: 0,
                records_written: 0,
                duration_seconds: start.elapsed().as_secs_f64(),
            });
        }

        let chunks = batch_records(records, self.config.chunk_size);
        let chunks_total = chunks.len();

        let pool = UpsertPool::new(self.config.upsert_concurrency);
        let outcomes = pool.run(&self.sink, chunks).await;

        let chunks_failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        let records_written = outcomes
            .iter()
            .filter(|o| o.succeeded())
            .map(|o| o.records)
            .sum();

        let report = SyncReport {
            records_merged,
            chunks_total,
            chunks_failed,
            records_written,
            duration_seconds: start.elapsed().as_secs_f64(),
        };

        if report.chunks_failed > 0 {
            warn!(
                chunks_failed = report.chunks_failed,
                chunks_total = report.chunks_total,
                records_written = report.records_written,
                "Sync finished with failed chunk writes"
            );
        } else {
            info!(
                records = report.records_written,
                chunks = report.chunks_total,
                "Sync complete in {:.2}s",
                report.duration_seconds
            );
        }

        Ok(report)
    }
}

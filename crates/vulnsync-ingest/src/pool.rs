//! Bounded upsert pool
//!
//! Applies chunk writes to a sink with a concurrency ceiling. Uses a
//! buffered stream so that at most `concurrency` writes are in flight and
//! a new chunk is admitted as soon as one completes. Completion order is
//! not submission order.
//!
//! Failure is chunk-local: a failing write is logged and recorded in its
//! outcome, and sibling writes are neither cancelled nor blocked.

use futures::stream::{self, StreamExt};
use tracing::{debug, error};

use crate::nvd::VulnerabilityRecord;
use crate::sink::{SinkError, VulnerabilitySink};

/// Outcome of one chunk write
#[derive(Debug)]
pub struct ChunkOutcome {
    /// Position of the chunk in submission order
    pub index: usize,
    /// Number of records in the chunk
    pub records: usize,
    /// The write error, if the chunk failed
    pub error: Option<SinkError>,
}

impl ChunkOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Dispatcher that never admits more than `concurrency` writes at once
///
/// A reusable primitive: it knows nothing about the sink beyond the
/// [`VulnerabilitySink`] capability.
pub struct UpsertPool {
    concurrency: usize,
}

impl UpsertPool {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Write all chunks, returning one outcome per chunk
    ///
    /// Outcomes are sorted by chunk index for deterministic reporting.
    pub async fn run<S: VulnerabilitySink>(
        &self,
        sink: &S,
        chunks: Vec<Vec<VulnerabilityRecord>>,
    ) -> Vec<ChunkOutcome> {
        let total = chunks.len();
        debug!(
            chunks = total,
            concurrency = self.concurrency,
            "Dispatching chunk writes"
        );

        let mut outcomes: Vec<ChunkOutcome> = stream::iter(chunks.into_iter().enumerate())
            .map(|(index, chunk)| async move {
                let records = chunk.len();

                match sink.upsert(&chunk).await {
                    Ok(()) => {
                        debug!(chunk = index + 1, total, records, "Chunk write complete");
                        ChunkOutcome {
                            index,
                            records,
                            error: None,
                        }
                    }
                    Err(e) => {
                        error!(
                            chunk = index + 1,
                            total,
                            records,
                            error = %e,
                            "Chunk write failed"
                        );
                        ChunkOutcome {
                            index,
                            records,
                            error: Some(e),
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        outcomes.sort_by_key(|outcome| outcome.index);
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemoryVulnerabilitySink, SinkResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn record(id: &str) -> VulnerabilityRecord {
        VulnerabilityRecord {
            id: id.to_string(),
            description: "test".to_string(),
            severity: "LOW".to_string(),
            base_score: 1.0,
            published_date: Utc::now(),
            cwe: "N/A".to_string(),
        }
    }

    fn chunks(count: usize) -> Vec<Vec<VulnerabilityRecord>> {
        (0..count)
            .map(|n| vec![record(&format!("CVE-2024-{:04}", n))])
            .collect()
    }

    /// Sink that tracks how many writes are in flight simultaneously
    #[derive(Default)]
    struct GaugeSink {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VulnerabilitySink for GaugeSink {
        async fn upsert(&self, _records: &[VulnerabilityRecord]) -> SinkResult<()> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(10)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Sink that fails any chunk containing the poisoned id
    struct PoisonedSink {
        inner: MemoryVulnerabilitySink,
        poisoned_id: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VulnerabilitySink for PoisonedSink {
        async fn upsert(&self, records: &[VulnerabilityRecord]) -> SinkResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if records.iter().any(|r| r.id == self.poisoned_id) {
                return Err(SinkError::Rejected("poisoned chunk".to_string()));
            }
            self.inner.upsert(records).await
        }
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        let sink = GaugeSink::default();
        let pool = UpsertPool::new(10);

        let outcomes = pool.run(&sink, chunks(25)).await;

        assert_eq!(outcomes.len(), 25);
        assert!(outcomes.iter().all(ChunkOutcome::succeeded));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 25);
        assert_eq!(sink.max_in_flight.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_failing_chunk_does_not_block_siblings() {
        let sink = PoisonedSink {
            inner: MemoryVulnerabilitySink::new(),
            poisoned_id: "CVE-2024-0003".to_string(),
            calls: AtomicUsize::new(0),
        };
        let pool = UpsertPool::new(4);

        let outcomes = pool.run(&sink, chunks(8)).await;

        // Every chunk was attempted, exactly one failed
        assert_eq!(sink.calls.load(Ordering::SeqCst), 8);
        let failed: Vec<usize> = outcomes
            .iter()
            .filter(|o| !o.succeeded())
            .map(|o| o.index)
            .collect();
        assert_eq!(failed, vec![3]);
        assert_eq!(sink.inner.len(), 7);
    }

    #[tokio::test]
    async fn test_outcomes_sorted_by_submission_index() {
        let sink = GaugeSink::default();
        let pool = UpsertPool::new(5);

        let outcomes = pool.run(&sink, chunks(12)).await;

        let indices: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, (0..12).collect::<Vec<usize>>());
    }

    #[tokio::test]
    async fn test_empty_chunk_list() {
        let sink = MemoryVulnerabilitySink::new();
        let pool = UpsertPool::new(10);

        let outcomes = pool.run(&sink, Vec::new()).await;

        assert!(outcomes.is_empty());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_zero_concurrency_clamps_to_one() {
        let sink = GaugeSink::default();
        let pool = UpsertPool::new(0);

        let outcomes = pool.run(&sink, chunks(3)).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(sink.max_in_flight.load(Ordering::SeqCst), 1);
    }
}

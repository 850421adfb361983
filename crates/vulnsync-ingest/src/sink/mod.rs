//! Sink abstraction for persisted records
//!
//! The pipeline writes through an injected capability rather than a
//! module-level client, so the store can be swapped for an in-memory fake
//! in tests and dry runs.

use async_trait::async_trait;
use thiserror::Error;

use crate::nvd::VulnerabilityRecord;

pub mod memory;
pub mod postgres;

pub use memory::MemoryVulnerabilitySink;
pub use postgres::PgVulnerabilitySink;

/// Result type alias for sink operations
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Chunk-scoped, recoverable write errors
///
/// These are caught by the upsert pool and recorded per chunk; they never
/// abort the run.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Sink rejected write: {0}")]
    Rejected(String),
}

/// Keyed idempotent write interface over vulnerability records
///
/// `upsert` must insert new rows and overwrite existing rows sharing the
/// same `id`; re-applying the same records any number of times converges
/// to the same stored state. Implementations must tolerate concurrent
/// independent calls from multiple writers.
#[async_trait]
pub trait VulnerabilitySink: Send + Sync {
    async fn upsert(&self, records: &[VulnerabilityRecord]) -> SinkResult<()>;
}

#[async_trait]
impl<S: VulnerabilitySink + ?Sized> VulnerabilitySink for &S {
    async fn upsert(&self, records: &[VulnerabilityRecord]) -> SinkResult<()> {
        (**self).upsert(records).await
    }
}

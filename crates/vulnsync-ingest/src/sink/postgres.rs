//! Postgres sink
//!
//! Writes each chunk as one multi-row `INSERT ... ON CONFLICT (id) DO
//! UPDATE` statement. Each statement is independently atomic; no
//! transaction spans chunks, and the shared pool is safe for concurrent
//! writers.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::{SinkResult, VulnerabilitySink};
use crate::nvd::VulnerabilityRecord;

/// Sink backed by the `vulnerabilities` table
pub struct PgVulnerabilitySink {
    pool: PgPool,
}

impl PgVulnerabilitySink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VulnerabilitySink for PgVulnerabilitySink {
    async fn upsert(&self, records: &[VulnerabilityRecord]) -> SinkResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO vulnerabilities (id, description, severity, base_score, published_date, cwe) ",
        );

        builder.push_values(records, |mut row, record| {
            row.push_bind(&record.id)
                .push_bind(&record.description)
                .push_bind(&record.severity)
                .push_bind(record.base_score)
                .push_bind(record.published_date)
                .push_bind(&record.cwe);
        });

        builder.push(
            " ON CONFLICT (id) DO UPDATE SET \
             description = EXCLUDED.description, \
             severity = EXCLUDED.severity, \
             base_score = EXCLUDED.base_score, \
             published_date = EXCLUDED.published_date, \
             cwe = EXCLUDED.cwe",
        );

        let result = builder.build().execute(&self.pool).await?;
        debug!(rows = result.rows_affected(), "Upserted chunk");

        Ok(())
    }
}

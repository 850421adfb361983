//! In-memory sink
//!
//! Backs tests and the CLI `--dry-run` mode. Upserts land in a mutex-guarded
//! map keyed by record id, giving the same overwrite-by-key semantics as
//! the Postgres sink.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{SinkResult, VulnerabilitySink};
use crate::nvd::VulnerabilityRecord;

#[derive(Default)]
pub struct MemoryVulnerabilitySink {
    records: Mutex<HashMap<String, VulnerabilityRecord>>,
}

impl MemoryVulnerabilitySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct records stored
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored record for `id`, if any
    pub fn get(&self, id: &str) -> Option<VulnerabilityRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }

    /// Snapshot of the stored state
    pub fn snapshot(&self) -> HashMap<String, VulnerabilityRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl VulnerabilitySink for MemoryVulnerabilitySink {
    async fn upsert(&self, records: &[VulnerabilityRecord]) -> SinkResult<()> {
        let mut stored = self.records.lock().unwrap();
        for record in records {
            stored.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }
}

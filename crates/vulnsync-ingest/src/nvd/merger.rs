//! Feed merging and deduplication
//!
//! Two feed snapshots are collapsed into one canonical record set keyed by
//! vulnerability id. Precedence is by source, not arrival order: the
//! second slice overlays the first, so callers pass the lower-priority
//! ("recent") feed first and the authoritative ("modified") feed second.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::models::{RawEntry, VulnerabilityRecord};

/// Merge two entry sequences into an ordered, deduplicated record set
///
/// Iteration order of the result is first-seen insertion order; an id
/// present in both inputs keeps its original position but carries the
/// value derived from `modified`. Entries without an extractable id are
/// skipped.
pub fn merge_feeds(recent: &[RawEntry], modified: &[RawEntry]) -> Vec<VulnerabilityRecord> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut records: Vec<VulnerabilityRecord> = Vec::new();
    let mut skipped = 0usize;

    for entry in recent.iter().chain(modified.iter()) {
        let Some(record) = entry.to_record() else {
            skipped += 1;
            continue;
        };

        match positions.get(&record.id) {
            Some(&position) => records[position] = record,
            None => {
                positions.insert(record.id.clone(), records.len());
                records.push(record);
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "Skipped feed entries without an identifier");
    }
    debug!(
        recent = recent.len(),
        modified = modified.len(),
        merged = records.len(),
        "Merged feed snapshots"
    );

    records
}

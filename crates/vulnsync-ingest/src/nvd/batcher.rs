//! Record chunking for sink writes

use super::models::VulnerabilityRecord;

/// Split the canonical record set into fixed-size ordered chunks
///
/// Every chunk holds `chunk_size` records except possibly the last, which
/// holds the remainder. Relative order is preserved exactly and no record
/// is dropped. `chunk_size` must be positive; configuration validates it
/// before the pipeline runs.
pub fn batch_records(
    records: Vec<VulnerabilityRecord>,
    chunk_size: usize,
) -> Vec<Vec<VulnerabilityRecord>> {
    debug_assert!(chunk_size > 0);

    let total = (records.len() + chunk_size - 1) / chunk_size;
    let mut chunks = Vec::with_capacity(total);
    let mut iter = records.into_iter();

    loop {
        let chunk: Vec<VulnerabilityRecord> = iter.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn records(count: usize) -> Vec<VulnerabilityRecord> {
        (0..count)
            .map(|n| VulnerabilityRecord {
                id: format!("CVE-2024-{:04}", n),
                description: "test".to_string(),
                severity: "LOW".to_string(),
                base_score: 1.0,
                published_date: Utc::now(),
                cwe: "N/A".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_chunk_sizes_with_remainder() {
        let chunks = batch_records(records(1200), 500);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![500, 500, 200]);
    }

    #[test]
    fn test_exact_multiple_has_no_remainder_chunk() {
        let chunks = batch_records(records(1000), 500);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![500, 500]);
    }

    #[test]
    fn test_count_and_order_preserved() {
        let input = records(1234);
        let expected: Vec<String> = input.iter().map(|r| r.id.clone()).collect();

        let chunks = batch_records(input, 100);

        let total: usize = chunks.iter().map(Vec::len).sum();
        assert_eq!(total, 1234);

        let flattened: Vec<String> = chunks
            .into_iter()
            .flatten()
            .map(|r| r.id)
            .collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_empty_input_produces_no_chunks() {
        assert!(batch_records(Vec::new(), 500).is_empty());
    }

    #[test]
    fn test_chunk_size_larger_than_input() {
        let chunks = batch_records(records(3), 500);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 3);
    }
}

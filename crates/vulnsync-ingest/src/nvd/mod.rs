// NVD Feed Ingestion Module
//
// Handles the feed side of the synchronization pipeline: downloading the
// gzip-compressed NVD JSON 1.1 snapshots, decoding them, and collapsing
// the "recent" and "modified" sources into one canonical record set.
//
// Stages:
// - Fetch: HTTP client for the feed endpoints
// - Decode: gzip + JSON into FeedDocument
// - Merge: two documents -> one deduplicated, ordered record set
// - Batch: record set -> fixed-size chunks for the upsert pool
//
// Feed endpoints:
// - Recent:   https://nvd.nist.gov/feeds/json/cve/1.1/nvdcve-1.1-recent.json.gz
// - Modified: https://nvd.nist.gov/feeds/json/cve/1.1/nvdcve-1.1-modified.json.gz

pub mod batcher;
pub mod decoder;
pub mod fetcher;
pub mod merger;
pub mod models;

// Re-export main types
pub use batcher::batch_records;
pub use decoder::{decode_feed, decompress_gzip};
pub use fetcher::{FeedFetcher, FEED_USER_AGENT};
pub use merger::merge_feeds;
pub use models::{
    CvssMetrics, FeedDocument, RawEntry, VulnerabilityRecord, PLACEHOLDER_DESCRIPTION,
    UNKNOWN_CWE, UNKNOWN_SEVERITY,
};

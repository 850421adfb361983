//! Feed payload decoding
//!
//! Feed snapshots arrive as gzip-compressed JSON documents. Decoding
//! failures of either stage are fatal to the run; an absent entry list is
//! not a failure and decodes to an empty document.

use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

use super::models::FeedDocument;
use crate::error::{Result, SyncError};

/// Decompress gzip-compressed bytes
pub fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| SyncError::Decompress(e.to_string()))?;
    debug!(
        compressed = data.len(),
        decompressed = decompressed.len(),
        "Decompressed feed payload"
    );
    Ok(decompressed)
}

/// Decompress and parse one feed snapshot
pub fn decode_feed(compressed: &[u8]) -> Result<FeedDocument> {
    let raw = decompress_gzip(compressed)?;
    let document: FeedDocument = serde_json::from_slice(&raw)?;
    debug!(entries = document.items.len(), "Decoded feed document");
    Ok(document)
}

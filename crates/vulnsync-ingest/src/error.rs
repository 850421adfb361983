//! Error types for the feed synchronization pipeline
//!
//! Everything in this enum is fatal to the run: configuration problems are
//! caught before any network activity, and a failed fetch or decode aborts
//! the run before anything is written. Per-chunk write failures are a
//! separate, recoverable class ([`crate::sink::SinkError`]) that never
//! propagates past the upsert pool.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Fatal pipeline errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed request to {url} returned HTTP {status}")]
    Fetch {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Decompression error: {0}")]
    Decompress(String),

    #[error("Feed parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

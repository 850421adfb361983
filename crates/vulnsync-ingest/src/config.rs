//! Configuration management
//!
//! Everything comes from the environment (with `.env` support via
//! dotenvy). The two database secrets have no defaults: a missing secret
//! is a pre-flight configuration error raised before any network
//! activity.

use crate::error::{Result, SyncError};

// ============================================================================
// Defaults
// ============================================================================

/// Default endpoint for the "recent" feed snapshot.
pub const DEFAULT_RECENT_FEED_URL: &str =
    "https://nvd.nist.gov/feeds/json/cve/1.1/nvdcve-1.1-recent.json.gz";

/// Default endpoint for the "modified" feed snapshot.
pub const DEFAULT_MODIFIED_FEED_URL: &str =
    "https://nvd.nist.gov/feeds/json/cve/1.1/nvdcve-1.1-modified.json.gz";

/// Default number of records per chunk write.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default ceiling on concurrently in-flight chunk writes.
pub const DEFAULT_UPSERT_CONCURRENCY: usize = 10;

/// Default maximum database connections in the pool.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Postgres URL of the sink (password supplied separately)
    pub database_url: String,
    /// Privileged write credential, injected into the connect options
    pub database_password: String,
    pub recent_feed_url: String,
    pub modified_feed_url: String,
    pub chunk_size: usize,
    pub upsert_concurrency: usize,
    pub db_max_connections: u32,
}

impl SyncConfig {
    /// Load configuration from environment variables and validate it
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = SyncConfig {
            database_url: require_env("VULNSYNC_DATABASE_URL")?,
            database_password: require_env("VULNSYNC_DATABASE_PASSWORD")?,
            recent_feed_url: std::env::var("VULNSYNC_RECENT_FEED_URL")
                .unwrap_or_else(|_| DEFAULT_RECENT_FEED_URL.to_string()),
            modified_feed_url: std::env::var("VULNSYNC_MODIFIED_FEED_URL")
                .unwrap_or_else(|_| DEFAULT_MODIFIED_FEED_URL.to_string()),
            chunk_size: parse_env("VULNSYNC_CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?,
            upsert_concurrency: parse_env(
                "VULNSYNC_UPSERT_CONCURRENCY",
                DEFAULT_UPSERT_CONCURRENCY,
            )?,
            db_max_connections: parse_env(
                "VULNSYNC_DB_MAX_CONNECTIONS",
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(SyncError::Config(
                "Database URL cannot be empty".to_string(),
            ));
        }
        if self.database_password.trim().is_empty() {
            return Err(SyncError::Config(
                "Database password cannot be empty".to_string(),
            ));
        }
        if self.recent_feed_url.trim().is_empty() || self.modified_feed_url.trim().is_empty() {
            return Err(SyncError::Config("Feed URLs cannot be empty".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(SyncError::Config(
                "Chunk size must be greater than 0".to_string(),
            ));
        }
        if self.upsert_concurrency == 0 {
            return Err(SyncError::Config(
                "Upsert concurrency must be greater than 0".to_string(),
            ));
        }
        if self.db_max_connections == 0 {
            return Err(SyncError::Config(
                "Database connection limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| SyncError::Config(format!("Missing required environment variable {}", name)))
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| SyncError::Config(format!("Invalid value for {}: {}", name, value))),
        Err(_) => Ok(default),
    }
}

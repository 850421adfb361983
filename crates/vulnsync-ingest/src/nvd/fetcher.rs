//! Feed retrieval over HTTP
//!
//! One GET per resource per run, no retry and no request timeout; a hung
//! fetch blocks the whole run.

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{Result, SyncError};

/// Identifying header value; the NVD origin rejects anonymous clients
pub const FEED_USER_AGENT: &str = concat!("vulnsync/", env!("CARGO_PKG_VERSION"));

/// HTTP client for downloading feed snapshots
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(FEED_USER_AGENT)
            .build()
            .map_err(SyncError::Network)?;

        Ok(Self { client })
    }

    /// Fetch one feed resource, returning the raw (still compressed) body
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!(%url, "Fetching feed");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SyncError::Fetch {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!(%url, bytes = body.len(), "Feed downloaded");

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_body_on_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feeds/recent.json.gz"))
            .and(header("user-agent", FEED_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"compressed".to_vec()))
            .mount(&server)
            .await;

        let fetcher = FeedFetcher::new().unwrap();
        let url = format!("{}/feeds/recent.json.gz", server.uri());
        let body = fetcher.fetch(&url).await.unwrap();

        assert_eq!(body, b"compressed");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feeds/missing.json.gz"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = FeedFetcher::new().unwrap();
        let url = format!("{}/feeds/missing.json.gz", server.uri());

        match fetcher.fetch(&url).await {
            Err(SyncError::Fetch { status, url: failed }) => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(failed, url);
            }
            other => panic!("expected fetch error, got {:?}", other.map(|b| b.len())),
        }
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let fetcher = FeedFetcher::new().unwrap();

        // Port 1 is never listening
        let result = fetcher.fetch("http://127.0.0.1:1/feed.json.gz").await;
        assert!(matches!(result, Err(SyncError::Network(_))));
    }
}

//! Upstream text retrieval.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::{MappingError, Result};

/// Default timeout for a single feed download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Retrieves raw feed text from an upstream source.
///
/// Any failure is reported as [`MappingError::Transport`]; the resolver turns
/// that into an aborted refresh and keeps the store's previous contents.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// [`FeedFetcher`] backed by `reqwest`.
///
/// sec.gov rejects requests without a descriptive User-Agent, so one is
/// required at construction.
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_timeout(user_agent, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        log::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MappingError::transport(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MappingError::transport(url, format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MappingError::transport(url, e.to_string()))?;

        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

//! Shared plumbing for the upstream search sources.

use crate::models::search::SearchResource;
use async_trait::async_trait;
use std::time::Duration;

/// Sent on every outbound request. DuckDuckGo's HTML endpoint rejects
/// clients that do not look like a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Errors that can occur while talking to an upstream source
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("No API key configured")]
    MissingApiKey,
}

/// One upstream source of study resources.
///
/// `fetch` never fails: implementations log their own errors and return an
/// empty list so that one broken source cannot take down a search.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, topic: &str) -> Vec<SearchResource>;
}

/// Build the HTTP client used by the fetchers.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

pub(crate) fn ensure_success(response: &reqwest::Response) -> Result<(), FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status(status))
    }
}

use log::{info, warn};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// The Hong Kong Observatory "Yesterday's Weather" page.
pub const HKO_YESTERDAY_URL: &str = "https://www.hko.gov.hk/en/wxinfo/pastwx/ryes.htm";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

// The page serves a stripped-down variant to unknown clients; a desktop
// browser user agent gets the full tables.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),
}

/// Thin HTTP collaborator: one GET, browser headers, a timeout, and the body
/// as text. Everything downstream of the returned string is pure.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Builds a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<PageFetcher, FetchError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(PageFetcher { client })
    }

    /// Fetches `url` and returns the decoded body text.
    ///
    /// Non-2xx statuses, DNS failures and timeouts all map to a
    /// [`FetchError`]; there is no retry.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {url}: {e:?}");
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::BodyRead(url.to_string(), e))?;
        info!("Fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_default_timeout() {
        let fetcher = PageFetcher::new(DEFAULT_TIMEOUT);
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    async fn unroutable_url_maps_to_network_error() {
        let fetcher = PageFetcher::new(Duration::from_millis(500)).unwrap();

        let err = fetcher
            .fetch("http://nonexistent.invalid/page.htm")
            .await
            .unwrap_err();

        match err {
            FetchError::NetworkRequest(url, _) => {
                assert_eq!(url, "http://nonexistent.invalid/page.htm")
            }
            other => panic!("expected NetworkRequest, got {other:?}"),
        }
    }
}

//! Remote page fetching for the scrape pipelines.
//!
//! Single-attempt GET with browser-like headers; the upstream sources sit
//! behind anti-bot CDNs that reject obvious non-browser clients. Retries and
//! backoff are intentionally absent, a failed scrape is reported to the
//! operator and can simply be resubmitted.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use thiserror::Error;
use url::Url;

/// Also sent when downloading thumbnails, which sit behind the same CDN.
pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Shared HTTP client for fetching source pages.
#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(
            "sec-ch-ua",
            HeaderValue::from_static(
                "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"",
            ),
        );
        headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
        headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page body. Non-2xx responses are errors, there is no retry.
    pub async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let target = parse_target(url)?;

        let response = self
            .client
            .get(target.as_str())
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(response.text().await?)
    }
}

/// Validate an operator-submitted URL before hitting the network.
fn parse_target(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!("unsupported scheme: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_urls() {
        assert!(matches!(parse_target("not a url"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(parse_target("ftp://host/file"), Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_target("https://example.com/watch/123").is_ok());
        assert!(parse_target("  http://example.com/a  ").is_ok());
    }

    #[test]
    fn fetcher_builds() {
        assert!(PageFetcher::new().is_ok());
    }
}

//! HTTP fetch capability.
//!
//! Favicon validation and probing go through the [`Fetch`] trait so tests
//! can inject canned responses. The real implementation, [`HttpFetcher`],
//! follows redirects, applies the configured timeout and user agent, and
//! reports HTTP error statuses as data rather than errors: a 404 on a
//! favicon probe is an ordinary negative result.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{PagelensError, Result};

/// A realistic desktop browser user agent. Some hosts refuse favicon
/// requests from obvious bot agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// HTTP client configuration for favicon fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent string sent with each request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 5, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

/// The outcome of fetching a URL: final location after redirects, status,
/// declared content type, and the raw body.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// URL after following redirects.
    pub final_url: Url,
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value, if present.
    pub content_type: Option<String>,
    /// Raw response body.
    pub bytes: Vec<u8>,
}

impl FetchedResource {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetch capability consumed by favicon validation.
///
/// Implementations must only error on transport failures (DNS, connect,
/// timeout); HTTP error statuses belong in [`FetchedResource::status`].
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &Url, config: &FetchConfig) -> Result<FetchedResource>;
}

/// Reqwest-backed fetcher.
#[derive(Debug, Default, Clone)]
pub struct HttpFetcher;

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url, config: &FetchConfig) -> Result<FetchedResource> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(PagelensError::HttpError)?;

        let response = client
            .get(url.clone())
            .header("User-Agent", &config.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PagelensError::Timeout { timeout: config.timeout }
                } else {
                    PagelensError::HttpError(e)
                }
            })?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedResource { final_url, status, content_type, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 5);
        assert!(config.user_agent.contains("Mozilla"));
    }

    #[test]
    fn test_is_success() {
        let resource = FetchedResource {
            final_url: Url::parse("http://example.com/favicon.ico").unwrap(),
            status: 200,
            content_type: None,
            bytes: Vec::new(),
        };
        assert!(resource.is_success());

        let resource = FetchedResource { status: 404, ..resource };
        assert!(!resource.is_success());
    }
}

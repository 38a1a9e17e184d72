//! Structured page URL with derived views.
//!
//! The rest of the crate never re-parses URL strings ad hoc: a page URL is
//! parsed once into a [`PageUrl`] and every derived form (clean URL, host
//! root, first-segment root, domain) is a pure accessor on it.

use url::Url;

use crate::{PagelensError, Result};

/// A parsed page URL and its derived views.
///
/// # Example
///
/// ```rust
/// use pagelens_core::PageUrl;
///
/// let page = PageUrl::parse("https://www.example.com/blog/post?utm=1#top").unwrap();
/// assert_eq!(page.clean_url(), "https://www.example.com/blog/post");
/// assert_eq!(page.host_url(), "https://www.example.com");
/// assert_eq!(page.root_url(), "https://www.example.com/blog");
/// assert_eq!(page.domain(), "example.com");
/// ```
#[derive(Debug, Clone)]
pub struct PageUrl {
    url: Url,
}

impl PageUrl {
    /// Parses an absolute URL into a page record.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|e| PagelensError::InvalidUrl(e.to_string()))?;
        if url.host_str().is_none() {
            return Err(PagelensError::InvalidUrl(format!("URL has no host: {}", raw)));
        }
        Ok(Self { url })
    }

    /// The underlying parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The full URL as passed in, including query and fragment.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The network location (host, plus port if non-default).
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// The host with a leading `www.` label removed.
    pub fn domain(&self) -> String {
        let host = self.host();
        host.strip_prefix("www.").unwrap_or(&host).to_string()
    }

    /// Scheme + host + path, with query and fragment dropped.
    pub fn clean_url(&self) -> String {
        format!("{}://{}{}", self.url.scheme(), self.host(), self.url.path())
    }

    /// Scheme + host root, no path.
    pub fn host_url(&self) -> String {
        format!("{}://{}", self.url.scheme(), self.host())
    }

    /// Scheme + host + first path segment (the "site section" root).
    ///
    /// Falls back to [`host_url`](Self::host_url) when the path is empty.
    pub fn root_url(&self) -> String {
        match self.first_path_segment() {
            Some(segment) => format!("{}/{}", self.host_url(), segment),
            None => self.host_url(),
        }
    }

    /// The first non-empty path segment, if any.
    pub fn first_path_segment(&self) -> Option<String> {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.find(|s| !s.is_empty()))
            .map(|s| s.to_string())
    }

    /// Resolves a possibly-relative href against this page.
    ///
    /// Absolute http/https hrefs pass through untouched.
    pub fn join(&self, href: &str) -> Result<Url> {
        if href.starts_with("http://") || href.starts_with("https://") {
            return Url::parse(href).map_err(|e| PagelensError::InvalidUrl(e.to_string()));
        }
        self.url
            .join(href)
            .map_err(|e| PagelensError::InvalidUrl(e.to_string()))
    }
}

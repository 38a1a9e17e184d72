//! Favicon candidates and their validation lifecycle.

use tracing::debug;
use url::Url;

use crate::fetch::{Fetch, FetchConfig};
use crate::sniff;

/// Validation lifecycle of a candidate. The transition out of
/// `Unvalidated` happens exactly once; repeat calls to
/// [`FaviconCandidate::ensure_validated`] return the settled state without
/// touching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationState {
    #[default]
    Unvalidated,
    Valid,
    Invalid,
}

/// One discovered or hypothesized favicon link.
///
/// Candidates are created by the resolver (markup scan, conventional-file
/// probe, or cache hit), validated at most once, and discarded after the
/// ranked list is consumed.
#[derive(Debug, Clone)]
pub struct FaviconCandidate {
    /// Absolute URL of the icon as discovered.
    pub href: Url,
    /// Set only when the candidate came from the tiered cache; marks it
    /// pre-validated and trusted.
    pub source_cache_key: Option<String>,
    /// Declared `rel` value from the markup, e.g. "icon".
    pub declared_rel: String,
    /// Raw declared `sizes` attribute ("WxH"), or empty.
    pub declared_sizes: String,
    /// URL after following redirects; set by validation.
    pub resolved_href: Option<Url>,
    /// Pixel width, 0 until resolved (and for SVG).
    pub width: u32,
    /// Pixel height, 0 until resolved (and for SVG).
    pub height: u32,
    /// Sniffed media type, e.g. "image/png"; empty string means unknown.
    pub media_type: String,
    state: ValidationState,
}

impl FaviconCandidate {
    /// Candidate from a `<link>` element in the page head.
    pub fn from_link(href: Url, rel: &str, sizes: &str) -> Self {
        let (width, height) = parse_declared_sizes(sizes);
        Self {
            href,
            source_cache_key: None,
            declared_rel: rel.to_string(),
            declared_sizes: sizes.to_string(),
            resolved_href: None,
            width,
            height,
            media_type: String::new(),
            state: ValidationState::Unvalidated,
        }
    }

    /// Candidate from a conventional-filename probe; nothing is declared
    /// and existence is only confirmed by later validation.
    pub fn from_probe(href: Url) -> Self {
        Self::from_link(href, "", "")
    }

    /// Pre-validated candidate from the tiered cache.
    pub fn from_cache(href: Url, cache_key: &str) -> Self {
        let mut candidate = Self::from_link(href, "", "");
        candidate.source_cache_key = Some(cache_key.to_string());
        candidate
    }

    /// Current validation state; pure query.
    pub fn state(&self) -> ValidationState {
        self.state
    }

    /// True when the candidate came from the cache.
    pub fn is_cache_sourced(&self) -> bool {
        self.source_cache_key.is_some()
    }

    /// A candidate is valid iff validation resolved a final URL and a
    /// media type.
    pub fn is_valid(&self) -> bool {
        self.resolved_href.is_some() && !self.media_type.is_empty()
    }

    /// Pixel area, used by ranking.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Fetches and sniffs the candidate, settling its state.
    ///
    /// Idempotent: only the first call performs I/O. Every failure mode
    /// (transport error, HTTP error status, unrecognizable bytes) settles
    /// the state to `Invalid` and is swallowed; a failed favicon probe is
    /// an ordinary negative result, not an error.
    pub async fn ensure_validated(&mut self, fetcher: &dyn Fetch, config: &FetchConfig) -> ValidationState {
        if self.state != ValidationState::Unvalidated {
            return self.state;
        }

        self.state = match self.try_validate(fetcher, config).await {
            Some(()) => ValidationState::Valid,
            None => ValidationState::Invalid,
        };
        self.state
    }

    async fn try_validate(&mut self, fetcher: &dyn Fetch, config: &FetchConfig) -> Option<()> {
        let resource = match fetcher.fetch(&self.href, config).await {
            Ok(resource) => resource,
            Err(e) => {
                debug!(href = %self.href, error = %e, "favicon fetch failed");
                return None;
            }
        };

        if !resource.is_success() {
            debug!(href = %self.href, status = resource.status, "favicon fetch non-success");
            return None;
        }

        let media_type = sniff::sniff_image_type(&resource.bytes)?;
        if let Some((width, height)) = sniff::decode_dimensions(&resource.bytes) {
            self.width = width;
            self.height = height;
        } else {
            // SVG and undecodable rasters report no size.
            self.width = 0;
            self.height = 0;
        }

        self.resolved_href = Some(resource.final_url);
        self.media_type = media_type.to_string();
        Some(())
    }
}

/// Parses a declared `sizes="WxH"` attribute; anything else is 0x0.
fn parse_declared_sizes(sizes: &str) -> (u32, u32) {
    let mut parts = sizes.split('x');
    if let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next())
        && let (Ok(w), Ok(h)) = (w.trim().parse(), h.trim().parse())
    {
        return (w, h);
    }
    (0, 0)
}

//! Favicon candidate discovery and resolution.
//!
//! Resolution is a staged pipeline: consult the tiered cache, scan the
//! parsed page head for `<link>` declarations, fall back to conventional
//! filenames at the host root, validate just enough candidates to satisfy
//! the caller, and wrap ICO/SVG results in conversion-proxy URLs when no
//! directly renderable image was found. Validation is the only stage that
//! touches the network, and it is bounded by the validated-candidate
//! budget, not by how many candidates were discovered.

use std::sync::Arc;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::cache::FaviconCache;
use super::candidate::{FaviconCandidate, ValidationState};
use super::rank::{RankConfig, rank};
use super::{COMMON_FAVICON_FILES, ICO_TO_PNG_PATH, ResolveMode, SVG_TO_PNG_PATH};
use crate::fetch::{Fetch, FetchConfig};
use crate::page::PageUrl;

/// Tunable resolver policy.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub fetch: FetchConfig,
    pub rank: RankConfig,
    /// Base URL of the hosting tool for ICO/SVG conversion endpoints.
    /// `None` disables conversion-proxy wrapping.
    pub proxy_base: Option<Url>,
    /// How many validated candidates a resolution pass needs; the upper
    /// bound on blocking network calls per request.
    pub max_validated: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            rank: RankConfig::default(),
            proxy_base: None,
            max_validated: 1,
        }
    }
}

/// Resolves favicon candidates for a page.
pub struct FaviconResolver {
    cache: FaviconCache,
    fetcher: Arc<dyn Fetch>,
    config: ResolverConfig,
}

impl FaviconResolver {
    pub fn new(cache: FaviconCache, fetcher: Arc<dyn Fetch>, config: ResolverConfig) -> Self {
        Self { cache, fetcher, config }
    }

    pub fn cache(&self) -> &FaviconCache {
        &self.cache
    }

    /// Discovers candidates without any network traffic: cache lookup,
    /// head `<link>` scan, conventional-filename probes.
    ///
    /// In [`ResolveMode::BestOnly`] the scan stops at the first hit: a
    /// cache entry wins outright, otherwise the first matching `<link>`
    /// (validation stays lazy). Probes are only added when the markup
    /// yielded nothing, or in [`ResolveMode::All`].
    pub fn discover(&self, page: &PageUrl, html: Option<&Html>, mode: ResolveMode) -> Vec<FaviconCandidate> {
        let mut candidates = Vec::new();
        let mut seen: Vec<Url> = Vec::new();

        if let Some(hit) = self.cache.lookup(page) {
            seen.push(hit.href.clone());
            candidates.push(FaviconCandidate::from_cache(hit.href, &hit.key));
            if mode != ResolveMode::All {
                return candidates;
            }
        }

        let markup_candidates = match html {
            Some(html) => self.scan_head_links(page, html, mode, &mut seen),
            None => Vec::new(),
        };
        let markup_found = !markup_candidates.is_empty();
        candidates.extend(markup_candidates);

        if markup_found && mode != ResolveMode::All {
            return candidates;
        }

        // Fallback: conventional filenames at the host root. Existence is
        // confirmed by later validation, not here.
        for filename in COMMON_FAVICON_FILES {
            let Ok(href) = page.join(&format!("{}/{}", page.host_url(), filename)) else {
                continue;
            };
            if seen.contains(&href) {
                continue;
            }
            seen.push(href.clone());
            candidates.push(FaviconCandidate::from_probe(href));
        }

        candidates
    }

    /// Scans `<head>` for favicon `<link>` declarations.
    fn scan_head_links(
        &self,
        page: &PageUrl,
        html: &Html,
        mode: ResolveMode,
        seen: &mut Vec<Url>,
    ) -> Vec<FaviconCandidate> {
        let mut found = Vec::new();
        let selector = Selector::parse("head link").expect("static selector");

        for link in html.select(&selector) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let Ok(href) = page.join(href) else {
                continue;
            };
            if seen.contains(&href) {
                continue;
            }

            let rel = link.value().attr("rel").unwrap_or_default();
            if !rel_matches_favicon(rel) {
                continue;
            }

            seen.push(href.clone());
            let sizes = link.value().attr("sizes").unwrap_or_default();
            found.push(FaviconCandidate::from_link(href, rel, sizes));

            if mode != ResolveMode::All {
                break;
            }
        }

        found
    }

    /// Full resolution: discover, validate up to the budget, then wrap
    /// ICO/SVG results in conversion proxies when nothing renderable was
    /// found. Cache hits in best-only mode return without any validation.
    pub async fn resolve(&self, page: &PageUrl, html: Option<&Html>, mode: ResolveMode) -> Vec<FaviconCandidate> {
        let mut candidates = self.discover(page, html, mode);

        if mode != ResolveMode::All && candidates.first().is_some_and(|c| c.is_cache_sourced()) {
            return candidates;
        }

        validate_top_candidates(
            &mut candidates,
            self.config.max_validated,
            self.fetcher.as_ref(),
            &self.config.fetch,
        )
        .await;

        self.wrap_conversions(&mut candidates);
        candidates
    }

    /// Resolution plus ranking plus cache write-back: the whole per-request
    /// flow. A freshly validated (non-cache) winner is recorded into the
    /// discovered tier under the page's most specific search key.
    pub async fn resolve_and_rank(&self, page: &PageUrl, html: Option<&Html>, mode: ResolveMode) -> Vec<FaviconCandidate> {
        let candidates = self.resolve(page, html, mode).await;
        let ranked = rank(candidates, &self.config.rank, mode);

        if let Some(best) = ranked.first()
            && !best.is_cache_sourced()
            && best.is_valid()
        {
            let keys = FaviconCache::search_keys(page);
            if let Some(key) = keys.first() {
                let href = best.resolved_href.as_ref().unwrap_or(&best.href);
                if let Err(e) = self.cache.record_discovery(key, href) {
                    debug!(key = %key, error = %e, "failed to record discovered favicon");
                }
            }
        }

        ranked
    }

    /// The whole per-request flow from raw captured HTML: parse, resolve,
    /// rank, record. This is the entry point request handlers use.
    pub async fn resolve_page(&self, page: &PageUrl, html: Option<&str>, mode: ResolveMode) -> Vec<FaviconCandidate> {
        let parsed = html.map(Html::parse_document);
        self.resolve_and_rank(page, parsed.as_ref(), mode).await
    }

    /// Adds a PNG conversion-proxy candidate next to each ICO/SVG result.
    ///
    /// Skipped entirely when any validated candidate already decoded to a
    /// non-ICO/non-SVG image, or when no proxy base is configured.
    fn wrap_conversions(&self, candidates: &mut Vec<FaviconCandidate>) {
        let Some(proxy_base) = &self.config.proxy_base else {
            return;
        };

        let has_generic_image = candidates
            .iter()
            .any(|c| !c.media_type.is_empty() && c.media_type != "image/ico" && c.media_type != "image/svg");
        if has_generic_image {
            return;
        }

        let mut wrapped = Vec::new();
        for candidate in candidates.iter() {
            let path = match candidate.media_type.as_str() {
                "image/ico" => ICO_TO_PNG_PATH,
                "image/svg" => SVG_TO_PNG_PATH,
                _ => continue,
            };
            let Ok(mut proxy) = proxy_base.join(path) else {
                continue;
            };
            proxy.query_pairs_mut().append_pair("url", candidate.href.as_str());
            wrapped.push(FaviconCandidate::from_link(
                proxy,
                &candidate.declared_rel,
                &candidate.declared_sizes,
            ));
        }
        candidates.extend(wrapped);
    }
}

/// True when a `rel` attribute declares a favicon. The attribute is a
/// whitespace-separated token list; a bare string is one token.
fn rel_matches_favicon(rel: &str) -> bool {
    let rel = rel.to_ascii_lowercase();
    if rel.trim() == "shortcut icon" {
        return true;
    }
    rel.split_whitespace().any(|token| token == "icon" || token == "apple-touch-icon")
}

/// Validates candidates in ranked order until `max_count` validated ones
/// have been collected. Cache-sourced candidates are already trusted and
/// count toward the total without a network call.
pub async fn validate_top_candidates(
    candidates: &mut [FaviconCandidate],
    max_count: usize,
    fetcher: &dyn Fetch,
    config: &FetchConfig,
) {
    let mut validated = 0usize;
    for candidate in candidates.iter_mut() {
        if validated >= max_count {
            break;
        }
        if candidate.is_cache_sourced() {
            validated += 1;
            continue;
        }
        if candidate.ensure_validated(fetcher, config).await == ValidationState::Valid {
            validated += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_matching() {
        assert!(rel_matches_favicon("icon"));
        assert!(rel_matches_favicon("ICON"));
        assert!(rel_matches_favicon("shortcut icon"));
        assert!(rel_matches_favicon("apple-touch-icon"));
        assert!(rel_matches_favicon("apple-touch-icon precomposed"));
        assert!(!rel_matches_favicon("stylesheet"));
        assert!(!rel_matches_favicon("preload"));
        assert!(!rel_matches_favicon(""));
    }
}

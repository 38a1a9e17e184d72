//! Favicon candidate ranking.
//!
//! Candidates sort by a composite key: a coarse group (cache entries above
//! real images above ICO/SVG above conversion proxies) and, within a group,
//! the distance between the candidate's pixel area and the target area.
//! Upscaling a too-small icon looks worse than downscaling a large one, so
//! below-target candidates pay a penalty multiplier.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::candidate::FaviconCandidate;
use super::{ICO_TO_PNG_PATH, ResolveMode, SVG_TO_PNG_PATH};

/// Tunable ranking policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankConfig {
    /// Edge length in pixels the consumer will render the icon at.
    pub target_width: u32,
    /// Distance multiplier for candidates smaller than the target area.
    pub upscale_penalty: f64,
    /// Sentinel distance for candidates with unknown dimensions; sorts
    /// them last within their group.
    pub unknown_distance: f64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self { target_width: 20, upscale_penalty: 1.2, unknown_distance: 999_999.0 }
    }
}

/// Coarse rank groups, larger is better.
const GROUP_CACHE: u32 = 999;
const GROUP_IMAGE: u32 = 500;
const GROUP_ICO: u32 = 400;
const GROUP_SVG: u32 = 300;
const GROUP_ICO_PROXY: u32 = 200;
const GROUP_SVG_PROXY: u32 = 100;
const GROUP_UNKNOWN: u32 = 0;

/// Assigns a candidate to its rank group. Proxy paths are inspected before
/// the sniffed media type: a conversion URL always ranks as a proxy, even
/// though it serves PNG bytes.
fn group_of(candidate: &FaviconCandidate) -> u32 {
    if candidate.is_cache_sourced() {
        return GROUP_CACHE;
    }

    let path = candidate.href.path();
    if path.ends_with(ICO_TO_PNG_PATH) {
        return GROUP_ICO_PROXY;
    }
    if path.ends_with(SVG_TO_PNG_PATH) {
        return GROUP_SVG_PROXY;
    }

    match candidate.media_type.as_str() {
        "" => GROUP_UNKNOWN,
        "image/ico" => GROUP_ICO,
        "image/svg" => GROUP_SVG,
        _ => GROUP_IMAGE,
    }
}

/// Distance from the target area, penalized when upscaling would be needed.
fn distance_of(candidate: &FaviconCandidate, config: &RankConfig) -> f64 {
    let area = candidate.area();
    if area == 0 {
        return config.unknown_distance;
    }

    let target = config.target_width as u64 * config.target_width as u64;
    let diff = area.abs_diff(target) as f64;
    if area < target { diff * config.upscale_penalty } else { diff }
}

/// Ranks candidates best-first.
///
/// A cache-sourced first candidate short-circuits everything outside
/// [`ResolveMode::All`]: the cache already encodes the preferred choice and
/// re-ranking it would only add network lookups. Ties preserve discovery
/// order (stable sort).
pub fn rank(mut candidates: Vec<FaviconCandidate>, config: &RankConfig, mode: ResolveMode) -> Vec<FaviconCandidate> {
    if candidates.is_empty() {
        return candidates;
    }

    if candidates[0].is_cache_sourced() && mode != ResolveMode::All {
        candidates.truncate(1);
        return candidates;
    }

    // Distances carry at most one decimal place (integer areas times the
    // penalty), so tenths make an exact integral sort key.
    candidates.sort_by_key(|c| {
        let group = group_of(c);
        let tenths = (distance_of(c, config) * 10.0).round() as u64;
        (Reverse(group), tenths)
    });

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn candidate(href: &str, media_type: &str, width: u32, height: u32) -> FaviconCandidate {
        let mut c = FaviconCandidate::from_probe(Url::parse(href).unwrap());
        c.media_type = media_type.to_string();
        c.width = width;
        c.height = height;
        c
    }

    #[test]
    fn test_group_order() {
        let cached = FaviconCandidate::from_cache(Url::parse("http://e.com/i.ico").unwrap(), "e.com");
        assert_eq!(group_of(&cached), GROUP_CACHE);
        assert_eq!(group_of(&candidate("http://e.com/i.png", "image/png", 32, 32)), GROUP_IMAGE);
        assert_eq!(group_of(&candidate("http://e.com/i.ico", "image/ico", 32, 32)), GROUP_ICO);
        assert_eq!(group_of(&candidate("http://e.com/i.svg", "image/svg", 0, 0)), GROUP_SVG);
        assert_eq!(
            group_of(&candidate("http://tool/convert-ico-to-png?url=x", "image/png", 32, 32)),
            GROUP_ICO_PROXY
        );
        assert_eq!(
            group_of(&candidate("http://tool/convert-svg-to-png?url=x", "image/png", 32, 32)),
            GROUP_SVG_PROXY
        );
        assert_eq!(group_of(&candidate("http://e.com/i.png", "", 0, 0)), GROUP_UNKNOWN);
    }

    #[test]
    fn test_rank_prefers_generic_image_over_ico() {
        let ranked = rank(
            vec![
                candidate("http://e.com/a.ico", "image/ico", 20, 20),
                candidate("http://e.com/b.png", "image/png", 512, 512),
            ],
            &RankConfig::default(),
            ResolveMode::All,
        );
        assert_eq!(ranked[0].href.path(), "/b.png");
    }

    #[test]
    fn test_rank_within_group_prefers_closest_area() {
        let ranked = rank(
            vec![
                candidate("http://e.com/huge.png", "image/png", 512, 512),
                candidate("http://e.com/close.png", "image/png", 24, 24),
            ],
            &RankConfig::default(),
            ResolveMode::All,
        );
        assert_eq!(ranked[0].href.path(), "/close.png");
    }

    #[test]
    fn test_upscale_penalty_monotonicity() {
        // Equal absolute distance from the 400px^2 target, one below and one
        // above: the smaller icon must never win.
        let config = RankConfig::default();
        let below = candidate("http://e.com/small.png", "image/png", 10, 30); // area 300
        let above = candidate("http://e.com/large.png", "image/png", 10, 50); // area 500
        assert!(distance_of(&below, &config) > distance_of(&above, &config));

        let ranked = rank(vec![below, above], &config, ResolveMode::All);
        assert_eq!(ranked[0].href.path(), "/large.png");
    }

    #[test]
    fn test_unknown_dimensions_sort_last_in_group() {
        let ranked = rank(
            vec![
                candidate("http://e.com/mystery.png", "image/png", 0, 0),
                candidate("http://e.com/known.png", "image/png", 512, 512),
            ],
            &RankConfig::default(),
            ResolveMode::All,
        );
        assert_eq!(ranked[0].href.path(), "/known.png");
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let ranked = rank(
            vec![
                candidate("http://e.com/first.png", "image/png", 32, 32),
                candidate("http://e.com/second.png", "image/png", 32, 32),
            ],
            &RankConfig::default(),
            ResolveMode::All,
        );
        assert_eq!(ranked[0].href.path(), "/first.png");
        assert_eq!(ranked[1].href.path(), "/second.png");
    }

    #[test]
    fn test_cache_short_circuit() {
        let cached = FaviconCandidate::from_cache(Url::parse("http://e.com/c.png").unwrap(), "e.com");
        let other = candidate("http://e.com/big.png", "image/png", 512, 512);

        let ranked = rank(vec![cached.clone(), other.clone()], &RankConfig::default(), ResolveMode::BestOnly);
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].is_cache_sourced());

        // In All mode the cache entry ranks first but nothing is dropped.
        let ranked = rank(vec![cached, other], &RankConfig::default(), ResolveMode::All);
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].is_cache_sourced());
    }

    #[test]
    fn test_rank_deterministic() {
        let make = || {
            vec![
                candidate("http://e.com/a.png", "image/png", 16, 16),
                candidate("http://e.com/b.ico", "image/ico", 32, 32),
                candidate("http://e.com/c.svg", "image/svg", 0, 0),
            ]
        };
        let first: Vec<String> = rank(make(), &RankConfig::default(), ResolveMode::All)
            .iter()
            .map(|c| c.href.to_string())
            .collect();
        let second: Vec<String> = rank(make(), &RankConfig::default(), ResolveMode::All)
            .iter()
            .map(|c| c.href.to_string())
            .collect();
        assert_eq!(first, second);
    }
}

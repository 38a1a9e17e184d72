//! Favicon discovery, caching, validation, and ranking.

pub mod cache;
pub mod candidate;
pub mod rank;
pub mod resolver;

pub use cache::{CacheHit, Clock, FaviconCache, FaviconCacheBuilder, SystemClock};
pub use candidate::{FaviconCandidate, ValidationState};
pub use rank::{RankConfig, rank};
pub use resolver::{FaviconResolver, ResolverConfig, validate_top_candidates};

/// `rel` values recognized as favicon declarations.
pub const FAVICON_RELS: [&str; 3] = ["icon", "apple-touch-icon", "shortcut icon"];

/// Conventional favicon filenames probed at the host root, in order.
pub const COMMON_FAVICON_FILES: [&str; 5] =
    ["favicon.png", "favicon.jpg", "favicon.gif", "favicon.ico", "favicon.svg"];

/// Path of the ICO to PNG conversion endpoint, served by the host tool.
pub const ICO_TO_PNG_PATH: &str = "convert-ico-to-png";

/// Path of the SVG to PNG conversion endpoint, served by the host tool.
pub const SVG_TO_PNG_PATH: &str = "convert-svg-to-png";

/// How much of the candidate space a resolution pass should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Stop at the first satisfactory candidate; minimal network traffic.
    #[default]
    BestOnly,
    /// Enumerate every candidate, for diagnostics and admin views.
    All,
}

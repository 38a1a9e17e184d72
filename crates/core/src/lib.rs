pub mod error;
pub mod favicon;
pub mod fetch;
pub mod lexicon;
pub mod page;
pub mod salience;
pub mod sniff;
pub mod unicode;

pub use error::{PagelensError, Result};
pub use favicon::{
    FaviconCache, FaviconCacheBuilder, FaviconCandidate, FaviconResolver, RankConfig, ResolveMode, ResolverConfig,
    ValidationState, rank, validate_top_candidates,
};
#[doc(hidden)]
pub use favicon::{CacheHit, Clock, SystemClock};
pub use fetch::{Fetch, FetchConfig, FetchedResource, HttpFetcher};
pub use lexicon::{Lexicon, WordCategory, looks_like_html};
pub use page::PageUrl;
pub use salience::{SalienceConfig, SalienceWalker, SoupElement, SoupLine, SoupToken, render_salient_text};
#[doc(hidden)]
pub use sniff::{decode_dimensions, sniff_image_type, sniff_text_label};
#[doc(hidden)]
pub use unicode::{CategoryCounts, count_categories, standard_distance, strip_non_alphanumeric_edges};

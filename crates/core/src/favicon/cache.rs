//! Tiered favicon cache.
//!
//! Three flat key -> URL stores in precedence order: user overrides,
//! curated defaults, and auto-discovered entries. Only the discovered tier
//! is ever written. Store files are YAML mappings read through a
//! freshness-checked in-process cache (modification time plus TTL), so a
//! hot path touches the filesystem at most once per TTL window while
//! external edits are still picked up promptly.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, warn};
use url::Url;

use crate::page::PageUrl;
use crate::{PagelensError, Result};

/// Time source for store-cache freshness checks. Injected so tests can
/// control the TTL/modification-time interplay without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock backed [`Clock`].
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A cache hit: the matched search key and the stored favicon URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit {
    pub key: String,
    pub href: Url,
}

#[derive(Debug, Clone)]
struct StoreEntry {
    data: BTreeMap<String, String>,
    modified: Option<SystemTime>,
    loaded_at: Instant,
}

/// The three-tier favicon cache.
#[derive(Clone)]
pub struct FaviconCache {
    overrides_path: PathBuf,
    defaults_path: PathBuf,
    discovered_path: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    store_cache: Arc<Mutex<HashMap<PathBuf, StoreEntry>>>,
}

impl FaviconCache {
    /// Cache with explicit store paths and default TTL/clock.
    pub fn new<P: AsRef<Path>>(overrides: P, defaults: P, discovered: P) -> Self {
        FaviconCacheBuilder::new()
            .overrides_path(overrides)
            .defaults_path(defaults)
            .discovered_path(discovered)
            .build()
    }

    /// Derives the ordered search keys for a page URL, most specific first:
    /// `host/first-path-segment` when the URL has a non-empty first path
    /// segment, then dotted-host suffixes down to the two-label root.
    ///
    /// Pure function of the URL; calling twice yields identical results.
    pub fn search_keys(page: &PageUrl) -> Vec<String> {
        let host = page.host();
        let mut keys = Vec::new();

        if let Some(segment) = page.first_path_segment() {
            keys.push(format!("{}/{}", host, segment));
        }

        let mut labels: Vec<&str> = host.split('.').collect();
        while labels.len() > 1 {
            keys.push(labels.join("."));
            labels.remove(0);
        }

        keys
    }

    /// Looks up a favicon for the page across all tiers.
    ///
    /// Tiers are consulted in precedence order (overrides, defaults,
    /// discovered); within each tier, keys go most to least specific. The
    /// first hit wins.
    pub fn lookup(&self, page: &PageUrl) -> Option<CacheHit> {
        let keys = Self::search_keys(page);

        for path in [&self.overrides_path, &self.defaults_path, &self.discovered_path] {
            let data = self.read_store(path);
            for key in &keys {
                if let Some(href) = data.get(key) {
                    debug!(key = %key, href = %href, store = %path.display(), "favicon cache hit");
                    match Url::parse(href) {
                        Ok(href) => return Some(CacheHit { key: key.clone(), href }),
                        Err(e) => {
                            warn!(key = %key, href = %href, error = %e, "ignoring malformed cached favicon URL");
                        }
                    }
                }
            }
        }

        None
    }

    /// Records a newly discovered favicon in the discovered tier.
    ///
    /// The key is normalized by stripping a leading `www.` label so both
    /// host spellings share one entry. The whole store is rewritten with
    /// keys in sorted order, and the in-process read cache for it is
    /// invalidated so the next lookup observes the write.
    pub fn record_discovery(&self, cache_key: &str, href: &Url) -> Result<()> {
        let key = cache_key.strip_prefix("www.").unwrap_or(cache_key);

        // Re-read the backing file directly; the in-process cache may be
        // up to a TTL stale and this write must not drop other entries.
        let mut data = read_store_file(&self.discovered_path);
        data.insert(key.to_string(), href.to_string());

        if let Some(parent) = self.discovered_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_yaml::to_string(&data).map_err(|e| PagelensError::StoreError {
            path: self.discovered_path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.discovered_path, serialized)?;

        self.invalidate(&self.discovered_path);
        Ok(())
    }

    /// Drops the cached read for one store path.
    fn invalidate(&self, path: &Path) {
        let mut cache = self.store_cache.lock().unwrap();
        cache.remove(path);
    }

    /// Reads a store through the freshness-checked cache. A cached entry is
    /// reused only while the file's modification time is unchanged and the
    /// entry is younger than the TTL.
    fn read_store(&self, path: &Path) -> BTreeMap<String, String> {
        let now = self.clock.now();
        let modified = fs::metadata(path).ok().and_then(|m| m.modified().ok());

        let mut cache = self.store_cache.lock().unwrap();
        if let Some(entry) = cache.get(path)
            && entry.modified == modified
            && now.duration_since(entry.loaded_at) < self.ttl
        {
            return entry.data.clone();
        }

        let data = read_store_file(path);
        cache.insert(
            path.to_path_buf(),
            StoreEntry { data: data.clone(), modified, loaded_at: now },
        );
        data
    }
}

/// Reads and parses one store file. Missing files and malformed documents
/// are both an empty mapping; the latter is logged.
fn read_store_file(path: &Path) -> BTreeMap<String, String> {
    let Ok(raw) = fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    match serde_yaml::from_str::<BTreeMap<String, String>>(&raw) {
        Ok(data) => data,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed favicon store, treating as empty");
            BTreeMap::new()
        }
    }
}

/// Builder for [`FaviconCache`] with injectable clock and TTL.
pub struct FaviconCacheBuilder {
    overrides_path: Option<PathBuf>,
    defaults_path: Option<PathBuf>,
    discovered_path: Option<PathBuf>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl FaviconCacheBuilder {
    pub fn new() -> Self {
        Self {
            overrides_path: None,
            defaults_path: None,
            discovered_path: None,
            ttl: Duration::from_secs(5),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn overrides_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.overrides_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn defaults_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.defaults_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn discovered_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.discovered_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Maximum age of an in-process store read before re-checking the file.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> FaviconCache {
        let config_dir = Self::default_config_dir();
        let data_dir = Self::default_data_dir();

        FaviconCache {
            overrides_path: self
                .overrides_path
                .unwrap_or_else(|| config_dir.join("favicon-overrides.yml")),
            defaults_path: self
                .defaults_path
                .unwrap_or_else(|| config_dir.join("favicon-defaults.yml")),
            discovered_path: self
                .discovered_path
                .unwrap_or_else(|| data_dir.join("favicon-discovered.yml")),
            ttl: self.ttl,
            clock: self.clock,
            store_cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Default directory for the curated stores (~/.config/pagelens).
    fn default_config_dir() -> PathBuf {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("pagelens")
    }

    /// Default directory for the discovered store (~/.local/share/pagelens).
    fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("local-cache"))
            .join("pagelens")
    }
}

impl Default for FaviconCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}

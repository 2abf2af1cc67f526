//! Process-lifetime resolution cache.
//!
//! Keyed by the exact input URL string (no normalization), so a key being
//! present always means that exact URL resolved successfully earlier in the
//! process. Bounded with least-recently-used eviction; the mutex makes the
//! check-then-insert safe if the pipeline is ever driven concurrently.

use std::collections::HashMap;
use std::sync::Mutex;

/// Default number of cached resolutions.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Metadata and source text stored for a resolved URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResolution {
    pub title: Option<String>,
    pub author: Option<String>,
    pub source_text: String,
}

struct Entry {
    resolution: CachedResolution,
    last_used: u64,
}

struct Inner {
    entries: HashMap<String, Entry>,
    clock: u64,
}

/// Bounded LRU cache of URL resolutions.
pub struct ResolutionCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl ResolutionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                clock: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Look up a URL, refreshing its recency on a hit.
    pub fn get(&self, url: &str) -> Option<CachedResolution> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.clock += 1;
        let clock = inner.clock;
        inner.entries.get_mut(url).map(|entry| {
            entry.last_used = clock;
            entry.resolution.clone()
        })
    }

    /// Store a resolution, evicting the least recently used entry when full.
    /// Inserting an existing key overwrites it (last write wins).
    pub fn insert(&self, url: &str, resolution: CachedResolution) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.clock += 1;
        let clock = inner.clock;

        if !inner.entries.contains_key(url) && inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            {
                inner.entries.remove(&oldest);
            }
        }

        inner.entries.insert(
            url.to_string(),
            Entry {
                resolution,
                last_used: clock,
            },
        );
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(text: &str) -> CachedResolution {
        CachedResolution {
            title: Some("A Title".to_string()),
            author: Some("An Author".to_string()),
            source_text: text.to_string(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ResolutionCache::new(4);
        assert!(cache.get("https://example.com/a").is_none());

        cache.insert("https://example.com/a", resolution("body"));
        let hit = cache.get("https://example.com/a").unwrap();
        assert_eq!(hit.title.as_deref(), Some("A Title"));
        assert_eq!(hit.source_text, "body");
    }

    #[test]
    fn test_exact_key_no_normalization() {
        let cache = ResolutionCache::new(4);
        cache.insert("https://example.com/a", resolution("body"));
        // A trailing slash is a different key
        assert!(cache.get("https://example.com/a/").is_none());
    }

    #[test]
    fn test_lru_eviction() {
        let cache = ResolutionCache::new(2);
        cache.insert("a", resolution("1"));
        cache.insert("b", resolution("2"));

        // Touch "a" so "b" becomes the eviction candidate
        cache.get("a");
        cache.insert("c", resolution("3"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = ResolutionCache::new(2);
        cache.insert("a", resolution("1"));
        cache.insert("b", resolution("2"));
        cache.insert("a", resolution("updated"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().source_text, "updated");
        assert!(cache.get("b").is_some());
    }
}

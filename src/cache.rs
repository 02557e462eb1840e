//! Time- and size-bounded page cache
//!
//! Entries expire on a sliding TTL: every hit pushes the deadline out again.
//! Expiry is lazy (checked at access time, no background sweeper) and when the
//! cache is full a new insert evicts the entry closest to expiring.

use crate::fingerprint::CacheKey;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry {
    body: String,
    deadline: Instant,
}

/// Bounded cache of sanitized pages keyed by URL fingerprint.
pub struct PageCache {
    max_entries: usize,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl PageCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            max_entries,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a page. A live hit refreshes the entry's deadline; an expired
    /// entry is removed and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();

        match entries.get_mut(key) {
            Some(entry) if entry.deadline > now => {
                entry.deadline = now + self.ttl;
                Some(entry.body.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a page, evicting the earliest-expiring entry if the cache is
    /// full. Writing an existing key replaces its body and deadline.
    pub fn put(&self, key: CacheKey, body: String) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();

        entries.retain(|_, entry| entry.deadline > now);

        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let evict = entries
                .iter()
                .min_by_key(|(_, entry)| entry.deadline)
                .map(|(key, _)| *key);
            if let Some(evict) = evict {
                entries.remove(&evict);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                body,
                deadline: now + self.ttl,
            },
        );
    }

    /// Number of unexpired entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().unwrap();
        entries.values().filter(|e| e.deadline > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint;

    #[test]
    fn test_cache_hit_and_miss() {
        let cache = PageCache::new(10, Duration::from_secs(60));
        let key = fingerprint("https://example.com");

        assert!(cache.get(&key).is_none());

        cache.put(key, "<html></html>".to_string());
        assert_eq!(cache.get(&key).as_deref(), Some("<html></html>"));
    }

    #[test]
    fn test_cache_expiry() {
        let cache = PageCache::new(10, Duration::from_millis(30));
        let key = fingerprint("https://example.com");

        cache.put(key, "body".to_string());
        std::thread::sleep(Duration::from_millis(60));

        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_sliding_ttl() {
        let cache = PageCache::new(10, Duration::from_millis(80));
        let key = fingerprint("https://example.com");

        cache.put(key, "body".to_string());

        // Keep touching the entry past its original deadline; each hit
        // should push the expiry out again.
        for _ in 0..3 {
            std::thread::sleep(Duration::from_millis(50));
            assert!(cache.get(&key).is_some());
        }

        std::thread::sleep(Duration::from_millis(120));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_cache_eviction_at_capacity() {
        let cache = PageCache::new(2, Duration::from_secs(60));
        let first = fingerprint("https://example.com/1");
        let second = fingerprint("https://example.com/2");
        let third = fingerprint("https://example.com/3");

        cache.put(first, "one".to_string());
        std::thread::sleep(Duration::from_millis(5));
        cache.put(second, "two".to_string());
        std::thread::sleep(Duration::from_millis(5));
        cache.put(third, "three".to_string());

        // The earliest-expiring entry (first) is evicted, exactly one.
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&first).is_none());
        assert!(cache.get(&second).is_some());
        assert!(cache.get(&third).is_some());
    }

    #[test]
    fn test_cache_rewrite_existing_key() {
        let cache = PageCache::new(1, Duration::from_secs(60));
        let key = fingerprint("https://example.com");

        cache.put(key, "old".to_string());
        cache.put(key, "new".to_string());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).as_deref(), Some("new"));
    }

    #[test]
    fn test_cache_refresh_affects_eviction_order() {
        let cache = PageCache::new(2, Duration::from_secs(60));
        let first = fingerprint("https://example.com/1");
        let second = fingerprint("https://example.com/2");
        let third = fingerprint("https://example.com/3");

        cache.put(first, "one".to_string());
        std::thread::sleep(Duration::from_millis(5));
        cache.put(second, "two".to_string());
        std::thread::sleep(Duration::from_millis(5));

        // Touching the first entry makes the second the earliest-expiring.
        assert!(cache.get(&first).is_some());
        cache.put(third, "three".to_string());

        assert!(cache.get(&first).is_some());
        assert!(cache.get(&second).is_none());
        assert!(cache.get(&third).is_some());
    }
}

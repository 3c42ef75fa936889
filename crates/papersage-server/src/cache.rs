//! Bounded LRU cache of analysis responses, keyed by session id.
//!
//! Entries expire after a TTL and are dropped when read past it.
//! A capacity of zero disables caching.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

struct CacheEntry {
    response: serde_json::Value,
    inserted_at: Instant,
}

/// Thread-safe session → response cache.
pub struct ResultCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Least recently used first.
    order: Vec<String>,
    max_size: usize,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Cached response for `session_id`. Returns None on miss or expired entry.
    pub fn get(&self, session_id: &str) -> Option<serde_json::Value> {
        let mut inner = self.inner.lock();

        let expired = inner
            .entries
            .get(session_id)
            .map(|e| e.inserted_at.elapsed() >= inner.ttl)?;

        if expired {
            inner.entries.remove(session_id);
            inner.order.retain(|k| k != session_id);
            return None;
        }

        if let Some(pos) = inner.order.iter().position(|k| k == session_id) {
            let key = inner.order.remove(pos);
            inner.order.push(key);
        }
        inner.entries.get(session_id).map(|e| e.response.clone())
    }

    pub fn put(&self, session_id: String, response: serde_json::Value) {
        let mut inner = self.inner.lock();
        if inner.max_size == 0 {
            return;
        }

        if inner.entries.contains_key(&session_id) {
            inner.order.retain(|k| k != &session_id);
        } else {
            while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
                let oldest = inner.order.remove(0);
                inner.entries.remove(&oldest);
            }
        }

        inner.order.push(session_id.clone());
        inner.entries.insert(
            session_id,
            CacheEntry {
                response,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_hit_and_miss() {
        let cache = ResultCache::new(10, Duration::from_secs(3600));
        assert!(cache.get("s1").is_none());

        cache.put("s1".into(), json!({"total_papers": 2}));
        assert_eq!(cache.get("s1"), Some(json!({"total_papers": 2})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_evicts_least_recently_used() {
        let cache = ResultCache::new(2, Duration::from_secs(3600));
        cache.put("a".into(), json!(1));
        cache.put("b".into(), json!(2));

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.put("c".into(), json!(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_cache_ttl_expiry() {
        let cache = ResultCache::new(10, Duration::from_millis(0));
        cache.put("old".into(), json!({}));
        assert!(cache.get("old").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_overwrite_and_clear() {
        let cache = ResultCache::new(2, Duration::from_secs(3600));
        cache.put("a".into(), json!(1));
        cache.put("a".into(), json!(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some(json!(2)));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_disables() {
        let cache = ResultCache::new(0, Duration::from_secs(3600));
        cache.put("a".into(), json!(1));
        assert!(cache.get("a").is_none());
    }
}

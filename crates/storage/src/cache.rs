//! Cache trait and LRU implementation.

use lru::LruCache;
use parking_lot::Mutex;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// A bounded keyed cache.
///
/// Implementations decide the eviction policy; callers may only rely on the
/// capacity bound. All methods take `&self` so a cache can sit behind an
/// `Arc` and be shared across threads.
pub trait Cache<K, V>: Send + Sync
where
    K: Clone,
    V: Clone,
{
    /// Look up a key, returning a clone of the stored value.
    fn get(&self, key: &K) -> Option<V>;

    /// Insert or overwrite a value. May evict another entry.
    fn put(&self, key: K, value: V);

    /// Remove a key if present.
    fn remove(&self, key: &K);

    /// Whether the key is present, without touching eviction order.
    fn contains(&self, key: &K) -> bool;

    /// Snapshot of the current keys.
    fn keys(&self) -> Vec<K>;

    /// Drop every entry.
    fn clear(&self);

    /// Number of entries currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// LRU-backed [`Cache`] with a fixed capacity.
pub struct BoundedLruCache<K: Hash + Eq, V> {
    inner: Mutex<LruCache<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> BoundedLruCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).expect("cache capacity must be positive");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl<K, V> Cache<K, V> for BoundedLruCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    fn remove(&self, key: &K) {
        self.inner.lock().pop(key);
    }

    fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    fn keys(&self) -> Vec<K> {
        self.inner.lock().iter().map(|(k, _)| k.clone()).collect()
    }

    fn clear(&self) {
        self.inner.lock().clear();
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let cache = BoundedLruCache::new(4);
        cache.put("a", 1u32);
        cache.put("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        assert!(cache.contains(&"b"));
        cache.remove(&"a");
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let cache = BoundedLruCache::new(2);
        cache.put("a", 1u32);
        cache.put("b", 2);
        cache.get(&"a");
        cache.put("c", 3);

        // "b" was the least recently used entry
        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"a"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear_and_keys() {
        let cache = BoundedLruCache::new(4);
        cache.put("a", 1u32);
        cache.put("b", 2);
        let mut keys = cache.keys();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.keys().is_empty());
    }
}

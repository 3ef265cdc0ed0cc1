//! Least-recently-used eviction decorator.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use metaprop_reflect::Value;

use crate::{Cache, CacheError, CacheKey};

/// Default number of entries an [`LruCache`] keeps.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Keeps at most `capacity` entries in the wrapped cache, removing the least
/// recently used key when a new one pushes past the limit.
///
/// Both `get` and `put` count as a use. Recency is tracked here; the
/// delegate only ever sees the resulting `remove`.
pub struct LruCache<C> {
    delegate: C,
    capacity: NonZeroUsize,
    recency: Mutex<lru::LruCache<CacheKey, ()>>,
}

impl<C: Cache> LruCache<C> {
    pub fn new(delegate: C) -> Self {
        let capacity = NonZeroUsize::MIN.saturating_add(DEFAULT_CAPACITY - 1);
        Self::with_nonzero_capacity(delegate, capacity)
    }

    /// Wrap `delegate` with an explicit capacity. Zero is rejected.
    pub fn with_capacity(delegate: C, capacity: usize) -> Result<Self, CacheError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| CacheError::invalid("lru capacity must be at least 1"))?;
        Ok(Self::with_nonzero_capacity(delegate, capacity))
    }

    fn with_nonzero_capacity(delegate: C, capacity: NonZeroUsize) -> Self {
        Self {
            delegate,
            capacity,
            recency: Mutex::new(lru::LruCache::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn delegate(&self) -> &C {
        &self.delegate
    }

    fn recency(&self) -> Result<MutexGuard<'_, lru::LruCache<CacheKey, ()>>, CacheError> {
        self.recency
            .lock()
            .map_err(|_| CacheError::poisoned(self.delegate.id()))
    }
}

impl<C: Cache> Cache for LruCache<C> {
    fn id(&self) -> &str {
        self.delegate.id()
    }

    fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError> {
        self.delegate.put(key.clone(), value)?;
        let evicted = match self.recency()?.push(key.clone(), ()) {
            Some((old, ())) if old != key => Some(old),
            _ => None,
        };
        if let Some(old) = evicted {
            log::trace!("cache '{}' evicting {}", self.id(), old);
            self.delegate.remove(&old)?;
        }
        Ok(())
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        // touch first so a hit counts as a use
        self.recency()?.get(key);
        self.delegate.get(key)
    }

    fn remove(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        self.recency()?.pop(key);
        self.delegate.remove(key)
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.recency()?.clear();
        self.delegate.clear()
    }

    fn size(&self) -> usize {
        self.delegate.size()
    }
}

impl<C: Cache> fmt::Debug for LruCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("id", &self.id())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PerpetualCache;

    fn key(i: i64) -> CacheKey {
        CacheKey::from_components([i])
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = LruCache::with_capacity(PerpetualCache::new("lru"), 2).unwrap();
        cache.put(key(1), Value::from(1)).unwrap();
        cache.put(key(2), Value::from(2)).unwrap();

        // use 1 so that 2 becomes the eldest
        assert!(cache.get(&key(1)).unwrap().is_some());
        cache.put(key(3), Value::from(3)).unwrap();

        assert_eq!(cache.get(&key(2)).unwrap(), None);
        assert_eq!(cache.get(&key(1)).unwrap(), Some(Value::from(1)));
        assert_eq!(cache.get(&key(3)).unwrap(), Some(Value::from(3)));
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn replacing_a_key_does_not_evict() {
        let cache = LruCache::with_capacity(PerpetualCache::new("lru"), 2).unwrap();
        cache.put(key(1), Value::from(1)).unwrap();
        cache.put(key(1), Value::from(10)).unwrap();
        cache.put(key(2), Value::from(2)).unwrap();

        assert_eq!(cache.get(&key(1)).unwrap(), Some(Value::from(10)));
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn removed_keys_free_their_slot() {
        let cache = LruCache::with_capacity(PerpetualCache::new("lru"), 2).unwrap();
        cache.put(key(1), Value::from(1)).unwrap();
        cache.put(key(2), Value::from(2)).unwrap();
        cache.remove(&key(1)).unwrap();
        cache.put(key(3), Value::from(3)).unwrap();

        assert_eq!(cache.get(&key(2)).unwrap(), Some(Value::from(2)));
        assert_eq!(cache.get(&key(3)).unwrap(), Some(Value::from(3)));
    }

    #[test]
    fn capacity_defaults_and_validation() {
        let cache = LruCache::new(PerpetualCache::new("lru"));
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
        assert_eq!(cache.delegate().id(), "lru");
        assert!(matches!(
            LruCache::with_capacity(PerpetualCache::new("lru"), 0),
            Err(CacheError::InvalidSettings { .. })
        ));
    }
}

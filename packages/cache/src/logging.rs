//! Hit-ratio logging decorator.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use metaprop_reflect::Value;

use crate::{Cache, CacheError, CacheKey};

/// Counts lookups and hits, logging the running hit ratio at `debug`
/// after every `get`.
pub struct LoggingCache<C> {
    delegate: C,
    requests: AtomicU64,
    hits: AtomicU64,
}

impl<C: Cache> LoggingCache<C> {
    pub fn new(delegate: C) -> Self {
        Self {
            delegate,
            requests: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Fraction of lookups that hit, or 0 before the first lookup.
    pub fn hit_ratio(&self) -> f64 {
        let requests = self.requests();
        if requests == 0 {
            return 0.0;
        }
        self.hits() as f64 / requests as f64
    }
}

impl<C: Cache> Cache for LoggingCache<C> {
    fn id(&self) -> &str {
        self.delegate.id()
    }

    fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError> {
        self.delegate.put(key, value)
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let value = self.delegate.get(key)?;
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        log::debug!("cache hit ratio [{}]: {}", self.id(), self.hit_ratio());
        Ok(value)
    }

    fn remove(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        self.delegate.remove(key)
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.delegate.clear()
    }

    fn size(&self) -> usize {
        self.delegate.size()
    }
}

impl<C: Cache> fmt::Debug for LoggingCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingCache")
            .field("id", &self.id())
            .field("requests", &self.requests())
            .field("hits", &self.hits())
            .finish_non_exhaustive()
    }
}

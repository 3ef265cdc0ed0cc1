//! Unbounded in-memory cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use metaprop_reflect::Value;

use crate::{Cache, CacheError, CacheKey};

/// The base store: a hash map that keeps every entry until removed or
/// cleared. Eviction and the other policies are decorators around it.
pub struct PerpetualCache {
    id: String,
    entries: Mutex<HashMap<CacheKey, Value>>,
}

impl PerpetualCache {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<CacheKey, Value>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::poisoned(&self.id))
    }
}

impl Cache for PerpetualCache {
    fn id(&self) -> &str {
        &self.id
    }

    fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError> {
        self.entries()?.insert(key, value);
        Ok(())
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn remove(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        Ok(self.entries()?.remove(key))
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries()?.clear();
        Ok(())
    }

    fn size(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for PerpetualCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerpetualCache")
            .field("id", &self.id)
            .field("size", &self.size())
            .finish()
    }
}

//! Cache registry - exactly one cache per namespace.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{Cache, CacheError};

/// Namespace-to-cache table shared by everything that needs a cache.
///
/// The first caller for a namespace builds its cache; every later caller
/// gets the same `Arc`, so all users of a namespace see one store.
#[derive(Default)]
pub struct CacheRegistry {
    caches: RwLock<HashMap<String, Arc<dyn Cache>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Cache>> {
        self.caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// The cache for `id`, building it with `build` if none exists yet.
    ///
    /// `build` runs at most once per namespace, under the registry's write
    /// lock. The cache it returns must report `id` as its own.
    pub fn get_or_create<F>(&self, id: &str, build: F) -> Result<Arc<dyn Cache>, CacheError>
    where
        F: FnOnce() -> Result<Arc<dyn Cache>, CacheError>,
    {
        if let Some(cache) = self.get(id) {
            return Ok(cache);
        }

        let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(cache) = caches.get(id) {
            return Ok(cache.clone());
        }

        let cache = build()?;
        if cache.id() != id {
            return Err(CacheError::Construction {
                id: id.to_string(),
                message: format!("builder returned a cache named '{}'", cache.id()),
            });
        }
        log::debug!("registered cache '{}'", id);
        caches.insert(id.to_string(), cache.clone());
        Ok(cache)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Registered namespaces, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

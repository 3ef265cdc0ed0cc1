//! Assembles a cache namespace from settings.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    BlockingCache, Cache, CacheError, CacheSettings, Eviction, LoggingCache, LruCache,
    PerpetualCache,
};

/// Stacks the decorators a [`CacheSettings`] asks for, innermost first:
/// perpetual store, eviction, logging, blocking.
///
/// # Example
///
/// ```rust
/// use metaprop_cache::{Cache, CacheBuilder, CacheKey, Eviction};
/// use metaprop_reflect::Value;
///
/// let cache = CacheBuilder::new("users")
///     .eviction(Eviction::Lru)
///     .size(2)
///     .build()
///     .unwrap();
///
/// for i in 0..3 {
///     cache.put(CacheKey::from_components([i]), Value::from(i)).unwrap();
/// }
/// assert_eq!(cache.size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    id: String,
    settings: CacheSettings,
}

impl CacheBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            settings: CacheSettings::default(),
        }
    }

    pub fn settings(mut self, settings: CacheSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn eviction(mut self, eviction: Eviction) -> Self {
        self.settings.eviction = eviction;
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.settings.size = size;
        self
    }

    pub fn blocking(mut self, blocking: bool) -> Self {
        self.settings.blocking = blocking;
        self
    }

    pub fn blocking_timeout(mut self, timeout: Duration) -> Self {
        self.settings.blocking = true;
        self.settings.blocking_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn logging(mut self, logging: bool) -> Self {
        self.settings.logging = logging;
        self
    }

    pub fn build(self) -> Result<Arc<dyn Cache>, CacheError> {
        if self.id.is_empty() {
            return Err(CacheError::Construction {
                id: self.id,
                message: "a cache needs a non-empty id".to_string(),
            });
        }
        self.settings.validate()?;

        let settings = self.settings;
        let mut cache: Box<dyn Cache> = Box::new(PerpetualCache::new(self.id));
        if settings.eviction == Eviction::Lru {
            cache = Box::new(LruCache::with_capacity(cache, settings.size)?);
        }
        if settings.logging {
            cache = Box::new(LoggingCache::new(cache));
        }
        if settings.blocking {
            let blocking = BlockingCache::new(cache);
            cache = match settings.blocking_timeout_ms {
                Some(ms) => Box::new(blocking.with_timeout(Duration::from_millis(ms))),
                None => Box::new(blocking),
            };
        }

        log::debug!("built cache '{}' with {:?}", cache.id(), settings);
        Ok(Arc::from(cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheKey;
    use metaprop_reflect::Value;
    use std::thread;

    fn key(i: i64) -> CacheKey {
        CacheKey::from_components([i])
    }

    #[test]
    fn unbounded_keeps_everything() {
        let cache = CacheBuilder::new("all")
            .eviction(Eviction::Unbounded)
            .logging(false)
            .build()
            .unwrap();
        for i in 0..2000 {
            cache.put(key(i), Value::from(i)).unwrap();
        }
        assert_eq!(cache.size(), 2000);
        assert_eq!(cache.id(), "all");
    }

    #[test]
    fn blocking_timeout_is_applied() {
        let cache = CacheBuilder::new("slow")
            .blocking_timeout(Duration::from_millis(20))
            .build()
            .unwrap();
        assert_eq!(cache.get(&key(1)).unwrap(), None);

        let other = cache.clone();
        let result = thread::spawn(move || other.get(&key(1))).join().unwrap();
        assert!(matches!(result, Err(CacheError::LockTimeout { .. })));

        cache.put(key(1), Value::from(1)).unwrap();
        assert_eq!(cache.get(&key(1)).unwrap(), Some(Value::from(1)));
    }

    #[test]
    fn from_settings_document() {
        let settings: CacheSettings =
            serde_json::from_str(r#"{ "eviction": "lru", "size": 1 }"#).unwrap();
        let cache = CacheBuilder::new("tiny").settings(settings).build().unwrap();
        cache.put(key(1), Value::from(1)).unwrap();
        cache.put(key(2), Value::from(2)).unwrap();
        assert_eq!(cache.get(&key(1)).unwrap(), None);
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn invalid_configurations() {
        assert!(matches!(
            CacheBuilder::new("").build(),
            Err(CacheError::Construction { .. })
        ));
        assert!(matches!(
            CacheBuilder::new("zero").size(0).build(),
            Err(CacheError::InvalidSettings { .. })
        ));
    }
}

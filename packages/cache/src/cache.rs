//! The Cache trait - the provider interface every store and decorator
//! implements.

use std::sync::{Arc, RwLock};

use metaprop_reflect::Value;

use crate::{CacheError, CacheKey};

/// A cache namespace.
///
/// Providers synchronize internally: every operation takes `&self`, and a
/// cache is shared between threads as `Arc<dyn Cache>`. Decorators wrap
/// another `Cache` and add one behavior each.
///
/// # Object Safety
///
/// This trait is object-safe, so decorators can be stacked at runtime
/// from [`CacheSettings`](crate::CacheSettings).
pub trait Cache: Send + Sync {
    /// The namespace identifier, fixed at construction.
    fn id(&self) -> &str;

    fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError>;

    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError>;

    /// Remove an entry.
    ///
    /// Transactional callers only use this to roll back a key that missed
    /// earlier in the transaction. Blocking providers rely on that to release
    /// the lock taken by the miss.
    fn remove(&self, key: &CacheKey) -> Result<Option<Value>, CacheError>;

    fn clear(&self) -> Result<(), CacheError>;

    /// Number of stored entries. Advisory only.
    fn size(&self) -> usize;

    /// Legacy coarse lock. Providers lock internally, so this is `None`
    /// unless a provider chooses to expose one.
    fn read_write_lock(&self) -> Option<&RwLock<()>> {
        None
    }
}

impl<C: Cache + ?Sized> Cache for Arc<C> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError> {
        (**self).put(key, value)
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        (**self).get(key)
    }

    fn remove(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), CacheError> {
        (**self).clear()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn read_write_lock(&self) -> Option<&RwLock<()>> {
        (**self).read_write_lock()
    }
}

impl<C: Cache + ?Sized> Cache for Box<C> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError> {
        (**self).put(key, value)
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        (**self).get(key)
    }

    fn remove(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), CacheError> {
        (**self).clear()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn read_write_lock(&self) -> Option<&RwLock<()>> {
        (**self).read_write_lock()
    }
}

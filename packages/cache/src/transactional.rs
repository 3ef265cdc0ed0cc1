//! Transaction-scoped buffering over a shared cache.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard};

use metaprop_reflect::Value;

use crate::{Cache, CacheError, CacheKey};

#[derive(Default)]
struct Pending {
    clear_on_commit: bool,
    entries: HashMap<CacheKey, Value>,
    missed: HashSet<CacheKey>,
}

/// Buffers one transaction's writes to a shared cache.
///
/// Reads go straight to the shared cache, but `put` and `clear` only take
/// effect on [`commit`](TransactionalCache::commit), so other transactions
/// never see uncommitted data. Keys that missed are remembered: commit
/// stores `Null` for the ones never populated, and rollback calls `remove`
/// on each of them, which releases the locks a [`BlockingCache`]
/// (crate::BlockingCache) placed on the miss.
pub struct TransactionalCache {
    delegate: Arc<dyn Cache>,
    pending: Mutex<Pending>,
}

impl TransactionalCache {
    pub fn new(delegate: Arc<dyn Cache>) -> Self {
        Self {
            delegate,
            pending: Mutex::new(Pending::default()),
        }
    }

    pub fn delegate(&self) -> &Arc<dyn Cache> {
        &self.delegate
    }

    /// Apply the buffered clear and writes to the shared cache.
    ///
    /// If the shared cache fails partway, the missed keys not yet written
    /// are released as on rollback before the error is returned.
    pub fn commit(&self) -> Result<(), CacheError> {
        let Pending {
            clear_on_commit,
            entries,
            mut missed,
        } = self.take_pending()?;
        let flushed = self.flush(clear_on_commit, entries, &mut missed);
        if flushed.is_err() {
            self.release(missed, "a failed commit");
        }
        flushed
    }

    /// Drop the buffered writes and release every key that missed.
    pub fn rollback(&self) -> Result<(), CacheError> {
        let pending = self.take_pending()?;
        self.release(pending.missed, "rollback");
        Ok(())
    }

    /// Write out one transaction, dropping each key from `missed` once the
    /// shared cache holds it.
    fn flush(
        &self,
        clear_on_commit: bool,
        entries: HashMap<CacheKey, Value>,
        missed: &mut HashSet<CacheKey>,
    ) -> Result<(), CacheError> {
        if clear_on_commit {
            self.delegate.clear()?;
        }
        let unpopulated: Vec<CacheKey> = missed
            .iter()
            .filter(|key| !entries.contains_key(*key))
            .cloned()
            .collect();
        for key in unpopulated {
            self.delegate.put(key.clone(), Value::Null)?;
            missed.remove(&key);
        }
        for (key, value) in entries {
            self.delegate.put(key.clone(), value)?;
            missed.remove(&key);
        }
        Ok(())
    }

    fn release(&self, keys: HashSet<CacheKey>, during: &str) {
        for key in keys {
            if let Err(e) = self.delegate.remove(&key) {
                log::warn!(
                    "cache '{}' could not release {} on {}: {}",
                    self.id(),
                    key,
                    during,
                    e
                );
            }
        }
    }

    fn pending(&self) -> Result<MutexGuard<'_, Pending>, CacheError> {
        self.pending
            .lock()
            .map_err(|_| CacheError::poisoned(self.delegate.id()))
    }

    fn take_pending(&self) -> Result<Pending, CacheError> {
        Ok(mem::take(&mut *self.pending()?))
    }
}

impl Cache for TransactionalCache {
    fn id(&self) -> &str {
        self.delegate.id()
    }

    /// Buffered until commit.
    fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError> {
        self.pending()?.entries.insert(key, value);
        Ok(())
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        let value = self.delegate.get(key)?;
        let mut pending = self.pending()?;
        if value.is_none() {
            pending.missed.insert(key.clone());
        }
        if pending.clear_on_commit {
            return Ok(None);
        }
        Ok(value)
    }

    /// Entries are never removed mid-transaction.
    fn remove(&self, _key: &CacheKey) -> Result<Option<Value>, CacheError> {
        Ok(None)
    }

    /// Deferred: the shared cache is cleared on commit, and until then
    /// this transaction reads every key as missing.
    fn clear(&self) -> Result<(), CacheError> {
        let mut pending = self.pending()?;
        pending.clear_on_commit = true;
        pending.entries.clear();
        Ok(())
    }

    fn size(&self) -> usize {
        self.delegate.size()
    }
}

impl fmt::Debug for TransactionalCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionalCache")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

/// One [`TransactionalCache`] per shared cache touched by a transaction.
#[derive(Debug, Default)]
pub struct TransactionalCacheManager {
    caches: HashMap<String, TransactionalCache>,
}

impl TransactionalCacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        cache: &Arc<dyn Cache>,
        key: &CacheKey,
    ) -> Result<Option<Value>, CacheError> {
        self.transactional(cache).get(key)
    }

    pub fn put(
        &mut self,
        cache: &Arc<dyn Cache>,
        key: CacheKey,
        value: Value,
    ) -> Result<(), CacheError> {
        self.transactional(cache).put(key, value)
    }

    pub fn clear(&mut self, cache: &Arc<dyn Cache>) -> Result<(), CacheError> {
        self.transactional(cache).clear()
    }

    /// Commit every cache; stops at the first failure.
    pub fn commit(&mut self) -> Result<(), CacheError> {
        for cache in self.caches.values() {
            cache.commit()?;
        }
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<(), CacheError> {
        for cache in self.caches.values() {
            cache.rollback()?;
        }
        Ok(())
    }

    fn transactional(&mut self, cache: &Arc<dyn Cache>) -> &TransactionalCache {
        self.caches
            .entry(cache.id().to_string())
            .or_insert_with(|| TransactionalCache::new(cache.clone()))
    }
}

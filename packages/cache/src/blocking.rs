//! Per-key blocking decorator.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use metaprop_reflect::Value;

use crate::{Cache, CacheError, CacheKey};

/// Lets only one caller at a time compute the value for a missing key.
///
/// A `get` that misses leaves the key locked, and the caller is expected to
/// compute the value and `put` it, or to `remove` the key if it gives up.
/// Either one releases the lock. Meanwhile every other `get` for that key
/// waits, up to the configured timeout when there is one.
///
/// The lock is not reentrant: the same thread missing twice on a key
/// without a `put` or `remove` in between waits on itself.
pub struct BlockingCache<C> {
    delegate: C,
    timeout: Option<Duration>,
    locked: Mutex<HashSet<CacheKey>>,
    released: Condvar,
}

impl<C: Cache> BlockingCache<C> {
    pub fn new(delegate: C) -> Self {
        Self {
            delegate,
            timeout: None,
            locked: Mutex::new(HashSet::new()),
            released: Condvar::new(),
        }
    }

    /// Give up waiting for a locked key after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn acquire(&self, key: &CacheKey) -> Result<(), CacheError> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let mut locked = self.locked.lock().map_err(|_| self.poisoned())?;

        while locked.contains(key) {
            locked = match deadline {
                None => self.released.wait(locked).map_err(|_| self.poisoned())?,
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(CacheError::LockTimeout {
                            cache: self.id().to_string(),
                            key: key.to_string(),
                            timeout: self.timeout.unwrap_or_default(),
                        });
                    }
                    self.released
                        .wait_timeout(locked, deadline - now)
                        .map_err(|_| self.poisoned())?
                        .0
                }
            };
        }
        locked.insert(key.clone());
        Ok(())
    }

    fn release(&self, key: &CacheKey) -> Result<(), CacheError> {
        let mut locked = self.locked.lock().map_err(|_| self.poisoned())?;
        if locked.remove(key) {
            self.released.notify_all();
        }
        Ok(())
    }

    fn poisoned(&self) -> CacheError {
        CacheError::poisoned(self.delegate.id())
    }
}

impl<C: Cache> Cache for BlockingCache<C> {
    fn id(&self) -> &str {
        self.delegate.id()
    }

    fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError> {
        let stored = self.delegate.put(key.clone(), value);
        self.release(&key)?;
        stored
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        self.acquire(key)?;
        match self.delegate.get(key) {
            // keep the lock: the caller is now computing this key
            Ok(None) => Ok(None),
            found => {
                self.release(key)?;
                found
            }
        }
    }

    /// Releases the lock taken by a miss. Nothing is removed from the
    /// delegate.
    fn remove(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        self.release(key)?;
        Ok(None)
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.delegate.clear()
    }

    fn size(&self) -> usize {
        self.delegate.size()
    }
}

impl<C: Cache> fmt::Debug for BlockingCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingCache")
            .field("id", &self.id())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PerpetualCache;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;

    fn key(part: &str) -> CacheKey {
        CacheKey::from_components([part])
    }

    #[test]
    fn waiter_sees_value_put_by_first_reader() {
        let cache = Arc::new(BlockingCache::new(PerpetualCache::new("blocking")));
        assert_eq!(cache.get(&key("k")).unwrap(), None);

        let (started, waiting) = mpsc::channel();
        let reader = {
            let cache = cache.clone();
            thread::spawn(move || {
                started.send(()).unwrap();
                cache.get(&key("k")).unwrap()
            })
        };

        waiting.recv().unwrap();
        thread::sleep(Duration::from_millis(20));
        cache.put(key("k"), Value::from("computed")).unwrap();

        assert_eq!(reader.join().unwrap(), Some(Value::from("computed")));
    }

    #[test]
    fn nan_key_blocks_the_second_reader() {
        let nan_key = || CacheKey::from_components([Value::Float(f64::NAN)]);
        let cache = Arc::new(BlockingCache::new(PerpetualCache::new("blocking")));
        assert_eq!(cache.get(&nan_key()).unwrap(), None);

        let (started, waiting) = mpsc::channel();
        let reader = {
            let cache = cache.clone();
            thread::spawn(move || {
                started.send(()).unwrap();
                cache.get(&nan_key()).unwrap()
            })
        };

        waiting.recv().unwrap();
        thread::sleep(Duration::from_millis(20));
        cache.put(nan_key(), Value::from(0.5)).unwrap();

        assert_eq!(reader.join().unwrap(), Some(Value::from(0.5)));
        assert_eq!(cache.get(&nan_key()).unwrap(), Some(Value::from(0.5)));
        assert!(cache.locked.lock().unwrap().is_empty());
    }

    #[test]
    fn waiter_times_out() {
        let cache = Arc::new(
            BlockingCache::new(PerpetualCache::new("blocking"))
                .with_timeout(Duration::from_millis(30)),
        );
        assert_eq!(cache.get(&key("k")).unwrap(), None);

        let other = cache.clone();
        let result = thread::spawn(move || other.get(&key("k")))
            .join()
            .unwrap();
        match result {
            Err(CacheError::LockTimeout { cache, timeout, .. }) => {
                assert_eq!(cache, "blocking");
                assert_eq!(timeout, Duration::from_millis(30));
            }
            other => panic!("expected a lock timeout, got {:?}", other),
        }
    }

    #[test]
    fn remove_releases_without_storing() {
        let cache = Arc::new(
            BlockingCache::new(PerpetualCache::new("blocking"))
                .with_timeout(Duration::from_secs(5)),
        );
        assert_eq!(cache.get(&key("k")).unwrap(), None);
        assert_eq!(cache.remove(&key("k")).unwrap(), None);

        let other = cache.clone();
        let result = thread::spawn(move || other.get(&key("k")))
            .join()
            .unwrap();
        // the second reader misses too and now holds the lock itself
        assert_eq!(result.unwrap(), None);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn hits_do_not_hold_the_lock() {
        let cache = BlockingCache::new(PerpetualCache::new("blocking"))
            .with_timeout(Duration::from_millis(10));
        cache.put(key("k"), Value::from(1)).unwrap();
        assert_eq!(cache.get(&key("k")).unwrap(), Some(Value::from(1)));
        assert_eq!(cache.get(&key("k")).unwrap(), Some(Value::from(1)));
        assert_eq!(cache.timeout(), Some(Duration::from_millis(10)));
    }
}

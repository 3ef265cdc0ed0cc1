//! Cache SPI for metaprop
//!
//! A `Cache` is one namespace of key/value entries shared between threads.
//! The base store keeps everything; policies are decorators that wrap any
//! other cache:
//! - `LruCache`: bounded, evicts the least recently used key
//! - `LoggingCache`: logs the hit ratio
//! - `BlockingCache`: one origin computation per missing key
//! - `TransactionalCache`: defers writes until commit
//!
//! `CacheBuilder` stacks them from `CacheSettings`, and `CacheRegistry`
//! makes sure each namespace is built once.
//!
//! # Example
//!
//! ```rust
//! use metaprop_cache::{Cache, CacheBuilder, CacheKey, CacheRegistry, TransactionalCache};
//! use metaprop_reflect::Value;
//!
//! let registry = CacheRegistry::new();
//! let users = registry
//!     .get_or_create("users", || CacheBuilder::new("users").build())
//!     .unwrap();
//!
//! let mut key = CacheKey::new();
//! key.update("selectUser");
//! key.update(42);
//!
//! let tx = TransactionalCache::new(users.clone());
//! tx.put(key.clone(), Value::from("Ada")).unwrap();
//! assert_eq!(users.get(&key).unwrap(), None);
//!
//! tx.commit().unwrap();
//! assert_eq!(users.get(&key).unwrap(), Some(Value::from("Ada")));
//! ```

mod blocking;
mod builder;
mod cache;
mod error;
mod eviction;
mod key;
mod logging;
mod perpetual;
mod registry;
mod settings;
mod transactional;

pub use blocking::BlockingCache;
pub use builder::CacheBuilder;
pub use cache::Cache;
pub use error::CacheError;
pub use eviction::{LruCache, DEFAULT_CAPACITY};
pub use key::CacheKey;
pub use logging::LoggingCache;
pub use perpetual::PerpetualCache;
pub use registry::CacheRegistry;
pub use settings::{CacheSettings, Eviction};
pub use transactional::{TransactionalCache, TransactionalCacheManager};

//! Cache configuration.

use serde::{Deserialize, Serialize};

use crate::eviction::DEFAULT_CAPACITY;
use crate::CacheError;

/// Eviction policy layered over the base store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eviction {
    /// Drop the least recently used entry past `size`.
    #[default]
    Lru,
    /// Keep everything.
    Unbounded,
}

/// How a cache namespace is assembled.
///
/// Every field has a default, so a settings document only names what it
/// changes:
///
/// ```rust
/// use metaprop_cache::{CacheSettings, Eviction};
///
/// let settings: CacheSettings =
///     serde_json::from_str(r#"{ "size": 64, "blocking": true }"#).unwrap();
/// assert_eq!(settings.eviction, Eviction::Lru);
/// assert_eq!(settings.size, 64);
/// assert!(settings.logging);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    pub eviction: Eviction,
    /// Entry limit for `Eviction::Lru`.
    pub size: usize,
    pub blocking: bool,
    /// How long a blocked reader waits. Waits forever when unset.
    pub blocking_timeout_ms: Option<u64>,
    pub logging: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            eviction: Eviction::Lru,
            size: DEFAULT_CAPACITY,
            blocking: false,
            blocking_timeout_ms: None,
            logging: true,
        }
    }
}

impl CacheSettings {
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.eviction == Eviction::Lru && self.size == 0 {
            return Err(CacheError::invalid("size must be at least 1 for lru eviction"));
        }
        if self.blocking_timeout_ms.is_some() && !self.blocking {
            return Err(CacheError::invalid(
                "blocking_timeout_ms is set but blocking is disabled",
            ));
        }
        Ok(())
    }
}

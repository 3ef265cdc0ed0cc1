//! Error type for cache providers.

use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A blocking cache gave up waiting for another reader to populate a key.
    #[error("timed out after {timeout:?} waiting for key '{key}' in cache '{cache}'")]
    LockTimeout {
        cache: String,
        key: String,
        timeout: Duration,
    },

    /// A thread panicked while holding the cache's lock.
    #[error("cache '{cache}' is poisoned")]
    Poisoned { cache: String },

    #[error("invalid cache settings: {message}")]
    InvalidSettings { message: String },

    #[error("cannot construct cache '{id}': {message}")]
    Construction { id: String, message: String },
}

impl CacheError {
    pub(crate) fn poisoned(cache: &str) -> Self {
        CacheError::Poisoned {
            cache: cache.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CacheError::InvalidSettings {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_timeout_display() {
        let e = CacheError::LockTimeout {
            cache: "users".to_string(),
            key: "17:42".to_string(),
            timeout: Duration::from_millis(250),
        };
        let display = e.to_string();
        assert!(display.contains("250ms"));
        assert!(display.contains("'users'"));
        assert!(display.contains("'17:42'"));
    }
}

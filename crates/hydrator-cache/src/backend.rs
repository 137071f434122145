//! The cache backend contract.

use std::sync::Arc;
use std::time::Duration;

/// A key/value store with per-entry expiry.
///
/// Implementations supply their own consistency; the hydrator only ever
/// performs single-key `get` and `put` calls.
pub trait CacheBackend: Send + Sync {
    /// Fetch a live entry.
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Store an entry. A zero `ttl` means the entry does not expire.
    fn put(&self, key: &str, value: serde_json::Value, ttl: Duration);
}

impl<T: CacheBackend + ?Sized> CacheBackend for Arc<T> {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        (**self).put(key, value, ttl);
    }
}

//! Class descriptor caching over a [`CacheBackend`].

use std::sync::Arc;
use std::time::Duration;

use hydrator_core::{ClassDescriptor, Result, normalize_pascal};

use crate::backend::CacheBackend;

/// Prefix prepended to every cache key unless configured otherwise.
pub const DEFAULT_PREFIX: &str = "hydrator";

/// Stores and retrieves [`ClassDescriptor`]s by class name.
///
/// Keys are the prefix followed by the normalized class name. Reads never
/// fail on bad payloads: a miss, a payload that is not a descriptor, and a
/// descriptor for another class all yield [`ClassDescriptor::empty`].
#[derive(Clone)]
pub struct MetadataCache {
    backend: Arc<dyn CacheBackend>,
    prefix: String,
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl MetadataCache {
    /// Wrap a backend using [`DEFAULT_PREFIX`].
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Use a different key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The backend key for a class.
    pub fn key(&self, class_name: &str) -> Result<String> {
        Ok(format!("{}{}", self.prefix, normalize_pascal(class_name)?))
    }

    /// Fetch the descriptor for `class_name`, or the empty sentinel.
    pub fn get(&self, class_name: &str) -> Result<ClassDescriptor> {
        let key = self.key(class_name)?;
        let Some(payload) = self.backend.get(&key) else {
            tracing::debug!(target: "hydrator::cache", key = %key, "Cache miss");
            return Ok(ClassDescriptor::empty());
        };

        let descriptor = match serde_json::from_value::<ClassDescriptor>(payload) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                tracing::warn!(
                    target: "hydrator::cache",
                    key = %key,
                    error = %e,
                    "Cached payload is not a class descriptor, ignoring"
                );
                return Ok(ClassDescriptor::empty());
            }
        };

        if descriptor.name() != class_name {
            tracing::warn!(
                target: "hydrator::cache",
                key = %key,
                expected = class_name,
                found = descriptor.name(),
                "Cached descriptor belongs to another class, ignoring"
            );
            return Ok(ClassDescriptor::empty());
        }

        tracing::debug!(target: "hydrator::cache", key = %key, "Cache hit");
        Ok(descriptor)
    }

    /// Store the descriptor for `class_name`.
    pub fn put(&self, class_name: &str, descriptor: &ClassDescriptor, ttl: Duration) -> Result<()> {
        let key = self.key(class_name)?;
        let payload = serde_json::to_value(descriptor)?;
        self.backend.put(&key, payload, ttl);
        tracing::debug!(
            target: "hydrator::cache",
            key = %key,
            rules = descriptor.rule_count(),
            ttl_secs = ttl.as_secs(),
            "Cached class descriptor"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCache;
    use hydrator_core::{Error, FieldRule, IntCaster};
    use serde_json::json;

    fn descriptor(name: &str) -> ClassDescriptor {
        let mut descriptor = ClassDescriptor::new(name);
        descriptor
            .add(FieldRule::new(name, "age", ["query"]).with_caster(IntCaster::new()))
            .unwrap();
        descriptor
    }

    fn setup() -> (Arc<MemoryCache>, MetadataCache) {
        let backend = Arc::new(MemoryCache::new());
        let cache = MetadataCache::new(backend.clone());
        (backend, cache)
    }

    #[test]
    fn test_key() {
        let (_, cache) = setup();
        assert_eq!(cache.key("app::User").unwrap(), "hydratorAppuser");
        assert_eq!(cache.key("user_profile").unwrap(), "hydratorUserProfile");

        let custom = cache.clone().with_prefix("v2:");
        assert_eq!(custom.key("User").unwrap(), "v2:User");
        assert!(matches!(cache.key("::"), Err(Error::EmptyResult { .. })));
    }

    #[test]
    fn test_round_trip() {
        let (_, cache) = setup();
        let stored = descriptor("app::User");
        cache.put("app::User", &stored, Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("app::User").unwrap(), stored);
    }

    #[test]
    fn test_miss_is_sentinel() {
        let (_, cache) = setup();
        assert!(cache.get("app::User").unwrap().is_empty_sentinel());
    }

    #[test]
    fn test_foreign_payload_is_sentinel() {
        let (backend, cache) = setup();
        let key = cache.key("app::User").unwrap();
        backend.put(&key, json!("not a descriptor"), Duration::ZERO);
        assert!(cache.get("app::User").unwrap().is_empty_sentinel());

        backend.put(&key, json!({"name": 5}), Duration::ZERO);
        assert!(cache.get("app::User").unwrap().is_empty_sentinel());
    }

    #[test]
    fn test_name_mismatch_is_sentinel() {
        let (_, cache) = setup();
        // Both names normalize to the same key.
        cache
            .put("app::User", &descriptor("appUser"), Duration::ZERO)
            .unwrap();
        assert_eq!(cache.key("app::User").unwrap(), cache.key("appUser").unwrap());
        assert!(cache.get("app::User").unwrap().is_empty_sentinel());
        assert_eq!(cache.get("appUser").unwrap().name(), "appUser");
    }

    #[test]
    fn test_prefixes_do_not_collide() {
        let (backend, cache) = setup();
        let other = MetadataCache::new(backend).with_prefix("other");
        cache
            .put("User", &descriptor("User"), Duration::ZERO)
            .unwrap();
        assert!(other.get("User").unwrap().is_empty_sentinel());
    }
}

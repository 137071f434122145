//! Hydrator configuration.

use std::time::Duration;

use hydrator_cache::DEFAULT_PREFIX;

/// Configuration for [`Hydrator`](crate::Hydrator) behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydratorConfig {
    /// Prefix of every metadata cache key (default: `"hydrator"`).
    pub cache_key_prefix: String,
    /// How long a class descriptor stays cached (default: one hour).
    /// A zero duration caches without expiry.
    pub cache_ttl: Duration,
    /// Whether every rule is checked against the current source and
    /// condition registries before it runs (default: `true`).
    ///
    /// Descriptors may come from a cache populated under different
    /// registries; with this off, a rule naming a source that is no longer
    /// registered still fails, but only when it is reached.
    pub revalidate_rules: bool,
}

impl Default for HydratorConfig {
    fn default() -> Self {
        Self {
            cache_key_prefix: DEFAULT_PREFIX.to_string(),
            cache_ttl: Duration::from_secs(3600),
            revalidate_rules: true,
        }
    }
}

impl HydratorConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache key prefix.
    pub fn cache_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache_key_prefix = prefix.into();
        self
    }

    /// Set the descriptor cache TTL.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Enable or disable rule re-validation.
    pub fn revalidate_rules(mut self, revalidate: bool) -> Self {
        self.revalidate_rules = revalidate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HydratorConfig::default();
        assert_eq!(config.cache_key_prefix, "hydrator");
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert!(config.revalidate_rules);
    }

    #[test]
    fn test_builder() {
        let config = HydratorConfig::new()
            .cache_key_prefix("forms:")
            .cache_ttl(Duration::ZERO)
            .revalidate_rules(false);
        assert_eq!(config.cache_key_prefix, "forms:");
        assert!(config.cache_ttl.is_zero());
        assert!(!config.revalidate_rules);
    }
}

//! Cached regex matching for the text formats casters accept.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use regex::Regex;

/// Integer literal: optional sign, no leading zeros.
pub const INTEGER: &str = r"^[+-]?(0|[1-9][0-9]*)$";

/// Decimal float literal with optional exponent. The decimal point is `.`.
pub const FLOAT: &str = r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$";

/// Unix timestamp in whole seconds.
pub const UNIX_SECONDS: &str = r"^-?[0-9]+$";

/// Thread-safe regex cache for compiled patterns.
///
/// Patterns are compiled lazily on first use and kept for the lifetime of
/// the program.
struct RegexCache {
    cache: RwLock<HashMap<String, Regex>>,
}

impl RegexCache {
    fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(regex) = cache.get(pattern) {
                return Ok(regex.clone());
            }
        }

        let regex = Regex::new(pattern)?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }
}

fn regex_cache() -> &'static RegexCache {
    static CACHE: OnceLock<RegexCache> = OnceLock::new();
    CACHE.get_or_init(RegexCache::new)
}

/// Check if a string matches a regex pattern.
///
/// An invalid pattern is logged and treated as a non-match.
pub fn matches_pattern(value: &str, pattern: &str) -> bool {
    match regex_cache().get_or_compile(pattern) {
        Ok(regex) => regex.is_match(value),
        Err(e) => {
            tracing::warn!(
                pattern = pattern,
                error = %e,
                "Invalid regex pattern, treating as non-match"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_pattern() {
        assert!(matches_pattern("0", INTEGER));
        assert!(matches_pattern("-42", INTEGER));
        assert!(matches_pattern("+42", INTEGER));
        assert!(!matches_pattern("042", INTEGER));
        assert!(!matches_pattern("4.2", INTEGER));
        assert!(!matches_pattern("", INTEGER));
    }

    #[test]
    fn test_float_pattern() {
        for ok in ["1", "1.34", "-123", "1.2e3", "7e-10", ".5", "5."] {
            assert!(matches_pattern(ok, FLOAT), "{ok} should match");
        }
        for bad in ["xyz", "1.2.3.4", "inf", "NaN", "1e", ""] {
            assert!(!matches_pattern(bad, FLOAT), "{bad} should not match");
        }
    }

    #[test]
    fn test_unix_seconds_pattern() {
        assert!(matches_pattern("1434368852", UNIX_SECONDS));
        assert!(matches_pattern("-1", UNIX_SECONDS));
        assert!(!matches_pattern("1434368852.5", UNIX_SECONDS));
    }

    #[test]
    fn test_invalid_pattern_returns_false() {
        assert!(!matches_pattern("anything", r"[unclosed"));
    }

    #[test]
    fn test_regex_caching() {
        assert!(matches_pattern("123", INTEGER));
        assert!(matches_pattern("456", INTEGER));
    }
}

//! Error types for configuration and programmer errors.
//!
//! Data-quality problems (a source value that a caster rejects) are *not*
//! represented here: those travel as [`CastError`](crate::cast::CastError)
//! values and end up in a [`FailureList`](crate::FailureList). Everything in
//! this module aborts the current call.

use thiserror::Error;

/// Result alias used throughout the hydrator crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A fatal configuration or programmer error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A name normalized down to nothing.
    #[error("unable to normalize {input:?}: result is empty")]
    EmptyResult {
        /// The name as supplied by the caller.
        input: String,
    },

    /// A value did not have the type an operation required.
    #[error("type mismatch{}: expected {expected}, got {found}", context_suffix(.context))]
    TypeMismatch {
        /// What was required.
        expected: &'static str,
        /// What was actually supplied.
        found: &'static str,
        /// Where the mismatch happened (e.g. `"User::age"`), may be empty.
        context: String,
    },

    /// A rule references a source that is not registered.
    #[error("missing/unrecognised source {name:?} in {context}")]
    UnknownSource { name: String, context: String },

    /// A rule references a condition that is not registered.
    #[error("missing/unrecognised condition {name:?} in {context}")]
    UnknownCondition { name: String, context: String },

    /// A from-directive lists an array style that is not recognized.
    #[error("unrecognised array style {name:?} in {context}")]
    UnknownArrayStyle { name: String, context: String },

    /// A cast directive names a caster that does not exist.
    #[error("unrecognised cast kind {name:?} in {context}")]
    UnknownCastKind { name: String, context: String },

    /// An object was asked to set a field it does not declare.
    #[error("{class} has no hydratable field {field:?}")]
    UnknownField { class: String, field: String },

    /// A registry already holds an entry under this (normalized) name.
    #[error("duplicated {kind} name {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// A field carries more than one cast directive.
    #[error("a property can only have zero or one cast options - {context} has multiple")]
    DuplicateCastDirective { context: String },

    /// Caster bounds, defaults or directive options are invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A fallible source callable reported an error.
    #[error("source {name:?} failed: {message}")]
    Source { name: String, message: String },

    /// A descriptor could not be encoded for the cache backend.
    #[error("cache error: {0}")]
    Cache(String),
}

fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" in {context}")
    }
}

impl Error {
    /// Build a [`Error::TypeMismatch`] without context.
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch {
            expected,
            found,
            context: String::new(),
        }
    }

    /// Build a [`Error::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Attach a location to a type mismatch that has none yet.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn with_context(self, location: impl Into<String>) -> Self {
        match self {
            Error::TypeMismatch {
                expected,
                found,
                context,
            } if context.is_empty() => Error::TypeMismatch {
                expected,
                found,
                context: location.into(),
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Cache(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = Error::type_mismatch("int", "text");
        assert_eq!(err.to_string(), "type mismatch: expected int, got text");

        let err = err.with_context("User::age");
        assert_eq!(
            err.to_string(),
            "type mismatch in User::age: expected int, got text"
        );
    }

    #[test]
    fn test_with_context_keeps_existing_context() {
        let err = Error::type_mismatch("int", "text")
            .with_context("User::age")
            .with_context("Other::field");
        match err {
            Error::TypeMismatch { context, .. } => assert_eq!(context, "User::age"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_with_context_ignores_other_variants() {
        let err = Error::configuration("bad").with_context("User::age");
        assert_eq!(err, Error::Configuration("bad".to_string()));
    }

    #[test]
    fn test_duplicate_name_display() {
        let err = Error::DuplicateName {
            kind: "source",
            name: "queryString".to_string(),
        };
        assert_eq!(err.to_string(), "duplicated source name queryString");
    }
}

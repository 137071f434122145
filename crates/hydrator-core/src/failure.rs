//! Structured records of rejected casts.
//!
//! A hydration run never aborts because a value was bad; each rejection is
//! recorded as a [`Failure`] in the caller's [`FailureList`] instead.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::cast::{CastError, CastErrorKind, Tokens, render_template};
use crate::value::Value;

/// One rejected cast attempt.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    input_field: String,
    input_value: Value,
    message: String,
    tokens: Tokens,
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<CastErrorKind>,
}

impl Failure {
    /// Create a failure for the given field.
    pub fn new(input_field: impl Into<String>) -> Self {
        Self {
            input_field: input_field.into(),
            ..Self::default()
        }
    }

    /// Build a failure from a caster's rejection.
    pub fn from_cast_error(
        input_field: impl Into<String>,
        input_value: Value,
        source: impl Into<String>,
        error: &CastError,
    ) -> Self {
        Self::new(input_field)
            .with_input_value(input_value)
            .with_message(error.message())
            .with_tokens(error.tokens().clone())
            .with_source(source)
            .with_kind(error.kind())
    }

    /// Set the rejected raw value.
    pub fn with_input_value(mut self, value: impl Into<Value>) -> Self {
        self.input_value = value.into();
        self
    }

    /// Set the message template.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the message tokens.
    pub fn with_tokens(mut self, tokens: Tokens) -> Self {
        self.tokens = tokens;
        self
    }

    /// Add one message token.
    pub fn with_token(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(key.into(), value.into());
        self
    }

    /// Set the name of the source that supplied the value.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the rejection reason.
    pub fn with_kind(mut self, kind: CastErrorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The field the value was requested under.
    pub fn input_field(&self) -> &str {
        &self.input_field
    }

    /// The raw value, before casting.
    pub fn input_value(&self) -> &Value {
        &self.input_value
    }

    /// The message template.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The message tokens.
    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// The source that supplied the value.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The rejection reason, when the failure came from a caster.
    pub fn kind(&self) -> Option<CastErrorKind> {
        self.kind
    }

    /// The message with its tokens substituted.
    pub fn rendered_message(&self) -> String {
        render_template(&self.message, &self.tokens)
    }
}

/// An ordered list of failures, owned by the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureList {
    failures: Vec<Failure>,
}

impl FailureList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a failure.
    pub fn push(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    /// Number of failures.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get a failure by position.
    pub fn get(&self, index: usize) -> Option<&Failure> {
        self.failures.get(index)
    }

    /// Replace the failure at `index`, returning the old one.
    ///
    /// Returns `None` and leaves the list unchanged when out of bounds.
    pub fn replace(&mut self, index: usize, failure: Failure) -> Option<Failure> {
        self.failures
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, failure))
    }

    /// Remove the failure at `index`, shifting later ones down.
    pub fn remove(&mut self, index: usize) -> Option<Failure> {
        (index < self.failures.len()).then(|| self.failures.remove(index))
    }

    /// Remove all failures.
    pub fn clear(&mut self) {
        self.failures.clear();
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Failure> {
        self.failures.iter()
    }

    /// Failures recorded for one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Failure> + 'a {
        self.failures
            .iter()
            .filter(move |failure| failure.input_field == field)
    }

    /// View as a slice.
    pub fn as_slice(&self) -> &[Failure] {
        &self.failures
    }
}

impl Index<usize> for FailureList {
    type Output = Failure;

    fn index(&self, index: usize) -> &Failure {
        &self.failures[index]
    }
}

impl IntoIterator for FailureList {
    type Item = Failure;
    type IntoIter = std::vec::IntoIter<Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a FailureList {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

impl Extend<Failure> for FailureList {
    fn extend<I: IntoIterator<Item = Failure>>(&mut self, iter: I) {
        self.failures.extend(iter);
    }
}

impl FromIterator<Failure> for FailureList {
    fn from_iter<I: IntoIterator<Item = Failure>>(iter: I) -> Self {
        Self {
            failures: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(field: &str) -> Failure {
        Failure::new(field)
            .with_input_value("bad")
            .with_message("Decimal must be between %min% and %max%")
            .with_token("min", "1")
            .with_token("max", "9")
            .with_source("query")
    }

    #[test]
    fn test_failure_accessors() {
        let f = failure("age");
        assert_eq!(f.input_field(), "age");
        assert_eq!(f.input_value(), &Value::from("bad"));
        assert_eq!(f.source(), "query");
        assert_eq!(f.tokens()["max"], "9");
        assert_eq!(f.rendered_message(), "Decimal must be between 1 and 9");
        assert!(f.kind().is_none());
    }

    #[test]
    fn test_from_cast_error() {
        let error = CastError::new(CastErrorKind::UuidWrongLength);
        let f = Failure::from_cast_error("id", Value::from("abc"), "body", &error);
        assert_eq!(f.kind(), Some(CastErrorKind::UuidWrongLength));
        assert_eq!(f.message(), CastErrorKind::UuidWrongLength.template());
        assert_eq!(f.source(), "body");
        assert_eq!(f.input_value(), &Value::from("abc"));
    }

    #[test]
    fn test_list_operations() {
        let mut list = FailureList::new();
        assert!(list.is_empty());
        list.push(failure("a"));
        list.push(failure("b"));
        list.push(failure("a"));

        assert_eq!(list.len(), 3);
        assert_eq!(list[1].input_field(), "b");
        assert_eq!(list.for_field("a").count(), 2);

        let old = list.replace(1, failure("c")).unwrap();
        assert_eq!(old.input_field(), "b");
        assert_eq!(list[1].input_field(), "c");
        assert!(list.replace(10, failure("x")).is_none());

        let removed = list.remove(0).unwrap();
        assert_eq!(removed.input_field(), "a");
        assert_eq!(list.len(), 2);
        assert!(list.remove(5).is_none());

        let fields: Vec<_> = list.iter().map(Failure::input_field).collect();
        assert_eq!(fields, vec!["c", "a"]);
    }

    #[test]
    fn test_collect_and_extend() {
        let mut list: FailureList = vec![failure("a")].into_iter().collect();
        list.extend([failure("b")]);
        let owned: Vec<Failure> = list.into_iter().collect();
        assert_eq!(owned.len(), 2);
    }

    #[test]
    fn test_serializes_as_array() {
        let list: FailureList = std::iter::once(failure("age")).collect();
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json[0]["inputField"], "age");
        assert_eq!(json[0]["source"], "query");
        assert_eq!(json[0]["tokens"]["min"], "1");
    }
}

//! Named sources and conditions a hydration run may consult.
//!
//! Names are normalized on the way in and on lookup, so `"query_string"`
//! and `"Query-String"` address the same entry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::identifiers::normalize;
use crate::value::Value;

// ============================================================================
// Sources
// ============================================================================

type SourceFn = dyn Fn(&str) -> std::result::Result<Value, String> + Send + Sync;

/// A provider of field values.
#[derive(Clone)]
pub enum Source {
    /// A read-only keyed container; missing keys read as null.
    Keyed(Arc<BTreeMap<String, Value>>),
    /// A callable taking the requested field name.
    Callable(Arc<SourceFn>),
}

impl Source {
    /// A keyed source built from `(key, value)` pairs.
    pub fn keyed<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Source::Keyed(Arc::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }

    /// A keyed source from a map value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(map) => Ok(Source::Keyed(Arc::new(map))),
            other => Err(Error::type_mismatch("map", other.type_name())),
        }
    }

    /// A keyed source from a decoded JSON object.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        Self::from_value(Value::from(json))
    }

    /// A callable source that always produces a value.
    pub fn callable<F, V>(f: F) -> Self
    where
        F: Fn(&str) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Source::Callable(Arc::new(
            move |field: &str| -> std::result::Result<Value, String> { Ok(f(field).into()) },
        ))
    }

    /// A callable source that may fail; a failure aborts the hydration call.
    pub fn fallible<F, V, E>(f: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<V, E> + Send + Sync + 'static,
        V: Into<Value>,
        E: fmt::Display,
    {
        Source::Callable(Arc::new(
            move |field: &str| -> std::result::Result<Value, String> {
                f(field).map(Into::into).map_err(|e| e.to_string())
            },
        ))
    }

    /// Read `field` from this source.
    pub fn fetch(&self, field: &str) -> std::result::Result<Value, String> {
        match self {
            Source::Keyed(map) => Ok(map.get(field).cloned().unwrap_or_default()),
            Source::Callable(f) => f(field),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Keyed(map) => f.debug_tuple("Keyed").field(map).finish(),
            Source::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl From<BTreeMap<String, Value>> for Source {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Source::Keyed(Arc::new(map))
    }
}

// ============================================================================
// Conditions
// ============================================================================

/// A zero-argument predicate gating a rule. Truthiness of the result decides.
#[derive(Clone)]
pub struct Condition(Arc<dyn Fn() -> Value + Send + Sync>);

impl Condition {
    /// Wrap a callable.
    pub fn new<F, V>(f: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Condition(Arc::new(move || -> Value { f().into() }))
    }

    /// A condition that always yields `value`.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Condition(Arc::new(move || value.clone()))
    }

    /// Call the predicate.
    pub fn evaluate(&self) -> Value {
        (self.0)()
    }

    /// Call the predicate and judge the result.
    pub fn holds(&self) -> bool {
        self.evaluate().is_truthy()
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Something stored in a [`Registry`].
pub trait RegistryEntry: Clone {
    /// Entry kind, for error messages.
    const KIND: &'static str;
}

impl RegistryEntry for Source {
    const KIND: &'static str = "source";
}

impl RegistryEntry for Condition {
    const KIND: &'static str = "condition";
}

/// Sources by normalized name.
pub type SourceRegistry = Registry<Source>;

/// Conditions by normalized name.
pub type ConditionRegistry = Registry<Condition>;

/// An insertion-ordered collection keyed by normalized name.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T: RegistryEntry> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under `name`.
    pub fn add(&mut self, name: &str, value: T) -> Result<&mut Self> {
        self.add_many([name], value)
    }

    /// Register one value under several names.
    ///
    /// Nothing is added if any name is empty after normalization or already
    /// taken.
    pub fn add_many<'a, I>(&mut self, names: I, value: T) -> Result<&mut Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut keys: Vec<String> = Vec::new();
        for name in names {
            let key = normalize(name)?;
            if self.entries.contains_key(&key) || keys.contains(&key) {
                return Err(Error::DuplicateName {
                    kind: T::KIND,
                    name: key,
                });
            }
            keys.push(key);
        }
        for key in keys {
            self.entries.insert(key, value.clone());
        }
        Ok(self)
    }

    /// Remove the entry under `name`, returning how many were removed.
    pub fn remove(&mut self, name: &str) -> Result<usize> {
        self.remove_many([name])
    }

    /// Remove several entries, returning how many were removed.
    pub fn remove_many<'a, I>(&mut self, names: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut removed = 0;
        for name in names {
            if self.entries.shift_remove(&normalize(name)?).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Remove everything, returning how many were removed.
    pub fn remove_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Look up an entry.
    pub fn get(&self, name: &str) -> Option<&T> {
        normalize(name).ok().and_then(|key| self.entries.get(&key))
    }

    /// Check if an entry exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Entries with their normalized names, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Normalized names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

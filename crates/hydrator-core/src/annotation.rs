//! Raw per-field annotations, as handed over by an annotation reader.
//!
//! These are plain carriers: nothing here is validated. The resolver turns
//! them into immutable [`FieldRule`](crate::FieldRule)s and never mutates them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One annotation attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    /// How values for the field are type cast.
    Cast(CastDirective),
    /// Where values for the field are read from.
    From(FromDirective),
}

impl From<CastDirective> for Annotation {
    fn from(directive: CastDirective) -> Self {
        Annotation::Cast(directive)
    }
}

impl From<FromDirective> for Annotation {
    fn from(directive: FromDirective) -> Self {
        Annotation::From(directive)
    }
}

/// Caster configuration: a kind (`"int"`, `"datetime"`, ...) plus options.
///
/// Option names are normalized before use, so `allow_null` and `allowNull`
/// are the same option.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CastDirective {
    /// Caster kind.
    pub kind: String,
    /// Caster options by name.
    pub options: BTreeMap<String, Value>,
    /// Element casters, for array casts.
    pub of: Vec<CastDirective>,
}

impl CastDirective {
    /// Create a directive for the given caster kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: BTreeMap::new(),
            of: Vec::new(),
        }
    }

    /// Integer cast.
    pub fn int() -> Self {
        Self::new("int")
    }

    /// Float cast.
    pub fn float() -> Self {
        Self::new("float")
    }

    /// Boolean cast.
    pub fn bool() -> Self {
        Self::new("bool")
    }

    /// String cast.
    pub fn string() -> Self {
        Self::new("string")
    }

    /// Array cast.
    pub fn array() -> Self {
        Self::new("array")
    }

    /// Date-time cast.
    pub fn datetime() -> Self {
        Self::new("datetime")
    }

    /// UUID cast.
    pub fn uuid() -> Self {
        Self::new("uuid")
    }

    /// Set an option.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Add an element caster (array casts only).
    pub fn of(mut self, directive: CastDirective) -> Self {
        self.of.push(directive);
        self
    }
}

/// Which sources feed a field, under which name, gated by which conditions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FromDirective {
    /// Source names, in the order they are consulted.
    pub sources: Vec<String>,
    /// Key requested from each source; the property name when unset or empty.
    pub field: Option<String>,
    /// Condition names that must all hold.
    pub conditions: Vec<String>,
    /// Array style hints (`basic`, `csv`, `ssv`, `tsv`, `pipes`, `semi`, `colon`).
    pub array_styles: Vec<String>,
}

impl FromDirective {
    /// Create a directive reading from the given sources.
    pub fn sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the key requested from each source.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the gating conditions.
    pub fn conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the array style hints.
    pub fn array_styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.array_styles = styles.into_iter().map(Into::into).collect();
        self
    }
}

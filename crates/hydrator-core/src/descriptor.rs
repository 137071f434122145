//! Resolved per-class hydration metadata.
//!
//! A [`ClassDescriptor`] holds, for each declared field, the ordered
//! [`FieldRule`]s that feed it. Descriptors are built once, never mutated by
//! the engine, and may be stored in an external cache as JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::array_style::ArrayStyle;
use crate::cast::TypeCaster;
use crate::error::{Error, Result};

// ============================================================================
// FieldRule
// ============================================================================

/// One hydration instruction for one declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    class_name: String,
    property: String,
    sources: Vec<String>,
    field: String,
    #[serde(default)]
    conditions: Vec<String>,
    #[serde(default)]
    array_styles: Vec<ArrayStyle>,
    #[serde(default)]
    caster: Option<TypeCaster>,
}

impl FieldRule {
    /// Create a rule reading `property` of `class_name` from `sources`.
    ///
    /// The requested field name defaults to the property name.
    pub fn new<I, S>(class_name: impl Into<String>, property: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let property = property.into();
        Self {
            class_name: class_name.into(),
            field: property.clone(),
            property,
            sources: sources.into_iter().map(Into::into).collect(),
            conditions: Vec::new(),
            array_styles: Vec::new(),
            caster: None,
        }
    }

    /// Request a different key from the sources. Empty keeps the property name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !field.is_empty() {
            self.field = field;
        }
        self
    }

    /// Gate the rule on these conditions.
    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the array style hints; duplicates are dropped, order is kept.
    pub fn with_array_styles(mut self, styles: impl IntoIterator<Item = ArrayStyle>) -> Self {
        self.array_styles.clear();
        for style in styles {
            if !self.array_styles.contains(&style) {
                self.array_styles.push(style);
            }
        }
        self
    }

    /// Cast fetched values with this caster.
    pub fn with_caster(mut self, caster: impl Into<TypeCaster>) -> Self {
        self.caster = Some(caster.into());
        self
    }

    /// The owning class.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The declared property written by this rule.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Source names, in the order they are consulted.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// The key requested from each source.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Condition names that must all hold.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Array style hints, in preference order.
    pub fn array_styles(&self) -> &[ArrayStyle] {
        &self.array_styles
    }

    /// The caster, if values are cast.
    pub fn caster(&self) -> Option<&TypeCaster> {
        self.caster.as_ref()
    }

    /// `Class::property`, for log and error context.
    pub fn location(&self) -> String {
        format!("{}::{}", self.class_name, self.property)
    }
}

// ============================================================================
// ClassDescriptor
// ============================================================================

/// All hydration rules for one class, grouped by property in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassDescriptor {
    name: String,
    properties: IndexMap<String, Vec<FieldRule>>,
}

impl ClassDescriptor {
    /// Create an empty descriptor for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    /// The sentinel returned on cache misses: no name, no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if this is the cache-miss sentinel.
    pub fn is_empty_sentinel(&self) -> bool {
        self.name.is_empty()
    }

    /// The class this descriptor belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a rule to its property.
    ///
    /// Fails if the rule belongs to another class.
    pub fn add(&mut self, rule: FieldRule) -> Result<()> {
        if rule.class_name != self.name {
            return Err(Error::configuration(format!(
                "cannot add property {} of class {} to the descriptor of class {}",
                rule.property, rule.class_name, self.name
            )));
        }
        self.properties
            .entry(rule.property.clone())
            .or_default()
            .push(rule);
        Ok(())
    }

    /// Rules for one property; empty when the property has none.
    pub fn get(&self, property: &str) -> &[FieldRule] {
        self.properties
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Check if a property has rules.
    pub fn contains(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Drop all rules for a property.
    pub fn remove(&mut self, property: &str) -> Option<Vec<FieldRule>> {
        self.properties.shift_remove(property)
    }

    /// Properties and their rules, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldRule])> {
        self.properties
            .iter()
            .map(|(property, rules)| (property.as_str(), rules.as_slice()))
    }

    /// Every rule, property by property.
    pub fn rules(&self) -> impl Iterator<Item = &FieldRule> {
        self.properties.values().flatten()
    }

    /// Number of properties with rules.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if no property has rules.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Total number of rules.
    pub fn rule_count(&self) -> usize {
        self.properties.values().map(Vec::len).sum()
    }
}

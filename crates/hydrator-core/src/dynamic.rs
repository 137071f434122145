//! Objects whose fields are declared at runtime.
//!
//! Provides `DynamicObject` for hydrating data whose shape is not known at
//! compile time.

use std::collections::HashMap;

use crate::annotation::Annotation;
use crate::error::{Error, Result};
use crate::object::Hydratable;
use crate::value::Value;

/// A field declaration for dynamic objects.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Annotations driving how the field is hydrated.
    pub annotations: Vec<Annotation>,
}

impl FieldDef {
    /// Create a new field declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    /// Attach an annotation.
    pub fn annotate(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotations.push(annotation.into());
        self
    }
}

/// A runtime-declared hydration target.
///
/// Unlike derived structs, `DynamicObject` stores field declarations and
/// values in maps. It is anonymous unless given a class name, in which case
/// its metadata may be cached like any other class.
///
/// # Example
///
/// ```
/// use hydrator_core::annotation::{CastDirective, FromDirective};
/// use hydrator_core::dynamic::{DynamicObject, FieldDef};
/// use hydrator_core::{Hydratable, Value};
///
/// let mut object = DynamicObject::anonymous();
/// object.add_field(
///     FieldDef::new("age")
///         .annotate(FromDirective::sources(["query"]))
///         .annotate(CastDirective::int()),
/// );
///
/// object.set_field("age", Value::Int(30)).unwrap();
/// assert_eq!(object.get("age"), Some(&Value::Int(30)));
/// assert!(object.is_anonymous());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DynamicObject {
    /// Class name; `None` for anonymous objects.
    class_name: Option<String>,
    /// Field declarations in insertion order.
    fields: Vec<FieldDef>,
    /// Current values by field name.
    values: HashMap<String, Value>,
}

impl DynamicObject {
    /// Create an anonymous object.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create a named object.
    pub fn named(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            ..Self::default()
        }
    }

    /// Declare a field. Redeclaring a name replaces the earlier declaration.
    pub fn add_field(&mut self, field: FieldDef) -> &mut Self {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == field.name) {
            *existing = field;
        } else {
            self.fields.push(field);
        }
        self
    }

    /// Get field declarations.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Get the value of a field, if one was written.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Check if a field has a value.
    pub fn has(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Remove a value, returning it.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.values.remove(field)
    }

    /// All written values, in declaration order.
    pub fn values(&self) -> Vec<(&str, &Value)> {
        self.fields
            .iter()
            .filter_map(|f| self.values.get(&f.name).map(|v| (f.name.as_str(), v)))
            .collect()
    }
}

impl Hydratable for DynamicObject {
    fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or("DynamicObject")
    }

    fn is_anonymous(&self) -> bool {
        self.class_name.is_none()
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        if !self.fields.iter().any(|f| f.name == name) {
            return Err(Error::UnknownField {
                class: self.class_name().to_string(),
                field: name.to_string(),
            });
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    fn annotations(&self, field: &str) -> Vec<Annotation> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.annotations.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{CastDirective, FromDirective};

    #[test]
    fn test_anonymous_and_named() {
        let anon = DynamicObject::anonymous();
        assert!(anon.is_anonymous());
        assert_eq!(anon.class_name(), "DynamicObject");

        let named = DynamicObject::named("app::Signup");
        assert!(!named.is_anonymous());
        assert_eq!(named.class_name(), "app::Signup");
    }

    #[test]
    fn test_set_and_get() {
        let mut object = DynamicObject::named("User");
        object
            .add_field(FieldDef::new("name"))
            .add_field(FieldDef::new("email"));

        object.set_field("email", Value::from("a@example.com")).unwrap();
        object.set_field("name", Value::from("Alice")).unwrap();

        assert!(object.has("name"));
        assert_eq!(object.get("name").and_then(Value::as_str), Some("Alice"));
        assert_eq!(object.field_names(), vec!["name", "email"]);

        let order: Vec<_> = object.values().into_iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["name", "email"]);

        assert_eq!(object.remove("name"), Some(Value::from("Alice")));
        assert!(!object.has("name"));
    }

    #[test]
    fn test_unknown_field() {
        let mut object = DynamicObject::named("User");
        let err = object.set_field("nope", Value::Int(1)).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownField {
                class: "User".to_string(),
                field: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_annotations() {
        let mut object = DynamicObject::anonymous();
        object.add_field(
            FieldDef::new("age")
                .annotate(FromDirective::sources(["query"]))
                .annotate(CastDirective::int()),
        );
        assert_eq!(object.annotations("age").len(), 2);
        assert!(object.annotations("other").is_empty());

        object.add_field(FieldDef::new("age"));
        assert_eq!(object.fields().len(), 1);
        assert!(object.annotations("age").is_empty());
    }
}

//! External sources of field annotations.
//!
//! Objects may describe their own fields through
//! [`Hydratable::annotations`](hydrator_core::Hydratable::annotations). An
//! [`AnnotationReader`] supplies annotations from outside the type, which is
//! how derived structs get theirs.

use std::collections::BTreeMap;
use std::sync::Arc;

use hydrator_core::Annotation;

/// Supplies the raw annotations for a field of a class.
pub trait AnnotationReader: Send + Sync {
    /// Annotations for `field` of `class_name`, in declaration order.
    fn annotations(&self, class_name: &str, field: &str) -> Vec<Annotation>;
}

impl<T: AnnotationReader + ?Sized> AnnotationReader for Arc<T> {
    fn annotations(&self, class_name: &str, field: &str) -> Vec<Annotation> {
        (**self).annotations(class_name, field)
    }
}

/// Annotations registered programmatically, per class and field.
///
/// # Example
///
/// ```
/// use hydrator::{AnnotationMap, AnnotationReader, CastDirective, FromDirective};
///
/// let mut map = AnnotationMap::new();
/// map.annotate("app::Signup", "age", FromDirective::sources(["query"]))
///     .annotate("app::Signup", "age", CastDirective::int());
///
/// assert_eq!(map.annotations("app::Signup", "age").len(), 2);
/// assert!(map.annotations("app::Signup", "email").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    classes: BTreeMap<String, BTreeMap<String, Vec<Annotation>>>,
}

impl AnnotationMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation to a field.
    pub fn annotate(
        &mut self,
        class_name: impl Into<String>,
        field: impl Into<String>,
        annotation: impl Into<Annotation>,
    ) -> &mut Self {
        self.classes
            .entry(class_name.into())
            .or_default()
            .entry(field.into())
            .or_default()
            .push(annotation.into());
        self
    }

    /// Builder form of [`AnnotationMap::annotate`].
    pub fn with(
        mut self,
        class_name: impl Into<String>,
        field: impl Into<String>,
        annotation: impl Into<Annotation>,
    ) -> Self {
        self.annotate(class_name, field, annotation);
        self
    }

    /// Drop every annotation of a class, returning whether it had any.
    pub fn forget(&mut self, class_name: &str) -> bool {
        self.classes.remove(class_name).is_some()
    }

    /// Check if a class has any annotations.
    pub fn contains_class(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Number of annotated classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if nothing is annotated.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl AnnotationReader for AnnotationMap {
    fn annotations(&self, class_name: &str, field: &str) -> Vec<Annotation> {
        self.classes
            .get(class_name)
            .and_then(|fields| fields.get(field))
            .cloned()
            .unwrap_or_default()
    }
}

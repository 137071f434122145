//! Populate Rust objects from named data sources.
//!
//! `hydrator` is the **primary entry point** of the workspace. It re-exports
//! the core types, the derive macro and the cache, and adds the pieces that
//! tie them together: the [`Hydrator`] engine, the [`MetadataResolver`] and
//! [`HydratorConfig`].
//!
//! # Overview
//!
//! Callers decode raw input (HTTP bodies, rows, CLI arguments) into
//! [`Source`]s and register them by name. Each field of a target object is
//! annotated with the sources it reads from, an optional field name, optional
//! gating [`Condition`]s and an optional caster. Hydration writes every value
//! that survives casting and returns a [`FailureList`] describing every value
//! that did not.
//!
//! # Quick Start
//!
//! ```
//! use hydrator::prelude::*;
//!
//! #[derive(Debug, Default, Hydratable)]
//! struct Signup {
//!     email: String,
//!     age: Option<i64>,
//! }
//!
//! let class = std::any::type_name::<Signup>();
//! let annotations = AnnotationMap::new()
//!     .with(class, "email", FromDirective::sources(["body"]))
//!     .with(class, "age", FromDirective::sources(["query", "body"]))
//!     .with(class, "age", CastDirective::int().option("min", 18).option("max", 130));
//!
//! let mut sources = SourceRegistry::new();
//! sources
//!     .add("query", Source::keyed([("age", "17")]))?
//!     .add("body", Source::keyed([("email", "a@example.com")]))?;
//!
//! let hydrator = Hydrator::new(HydratorConfig::default()).with_annotation_reader(annotations);
//! let mut signup = Signup::default();
//! let failures = hydrator.hydrate(&mut signup, &sources, None)?;
//!
//! assert_eq!(signup.email, "a@example.com");
//! assert_eq!(signup.age, None);
//! assert_eq!(failures[0].rendered_message(), "Decimal must be between 18 and 130");
//! # Ok::<(), hydrator::Error>(())
//! ```
//!
//! # Crates
//!
//! - `hydrator-core`: values, casters, registries, descriptors and failures.
//! - `hydrator-cache`: the cache backend contract and the metadata cache.
//! - `hydrator-macros`: `#[derive(Hydratable)]`.

pub mod annotations;
pub mod config;
pub mod engine;
pub mod resolver;

// Generated code refers to `hydrator_core` by name.
pub use hydrator_core;

pub use hydrator_core::{
    Annotation, ArrayCaster, ArrayStyle, BoolCaster, Cast, CastDirective, CastError,
    CastErrorKind, Casted, ClassDescriptor, Condition, ConditionRegistry, DateTimeCaster,
    DynamicObject, Error, Failure, FailureList, FieldDef, FieldRule, FloatCaster, FromDirective,
    FromValue, Hydratable, IntCaster, Registry, RegistryEntry, Result, Source, SourceRegistry,
    StringCaster, Tokens, TypeCaster, UuidCaster, Value, normalize, normalize_pascal,
};
pub use hydrator_macros::Hydratable;

pub use hydrator_cache::{CacheBackend, MemoryCache, MetadataCache};

pub use annotations::{AnnotationMap, AnnotationReader};
pub use config::HydratorConfig;
pub use engine::{FIELD_TYPE_MISMATCH, Hydrator};
pub use resolver::MetadataResolver;

/// Commonly used items.
///
/// Also brings `hydrator_core` into scope for `#[derive(Hydratable)]`.
pub mod prelude {
    pub use crate::hydrator_core;
    pub use crate::{
        AnnotationMap, AnnotationReader, CastDirective, Condition, ConditionRegistry,
        DynamicObject, Error, Failure, FailureList, FieldDef, FromDirective, Hydratable, Hydrator,
        HydratorConfig, MemoryCache, Result, Source, SourceRegistry, Value,
    };
}

//! Core types and traits for the hydrator.
//!
//! `hydrator-core` is the **foundation layer** of the workspace. It defines the
//! data model and the pure pieces of hydration that every other crate builds on.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Hydratable` is implemented by hydration targets, usually
//!   through `#[derive(Hydratable)]`; `Cast` is the contract every caster obeys.
//! - **Data model**: `Value` is what sources produce and fields receive;
//!   `FieldRule` and `ClassDescriptor` are the resolved per-class metadata.
//! - **Casting**: the `cast` module holds the int, float, bool, string, array,
//!   date-time and UUID casters. Casts are pure and report rejections as data.
//! - **Registries**: `SourceRegistry` and `ConditionRegistry` hold the named
//!   inputs of a hydration run.
//!
//! # Who Uses This Crate
//!
//! - `hydrator-macros` generates `Hydratable` implementations defined here.
//! - `hydrator-cache` stores `ClassDescriptor`s in a key/value backend.
//! - `hydrator` resolves annotations into descriptors and runs hydration.
//!
//! Most applications should use the `hydrator` facade; reach for
//! `hydrator-core` directly when writing casters or cache backends.

pub mod annotation;
pub mod array_style;
pub mod cast;
pub mod descriptor;
pub mod dynamic;
pub mod error;
pub mod failure;
pub mod identifiers;
pub mod object;
pub mod patterns;
pub mod registry;
pub mod value;

pub use annotation::{Annotation, CastDirective, FromDirective};
pub use array_style::{ArrayStyle, extract_with, split_delimited};
pub use cast::{
    ArrayCaster, BoolCaster, Cast, CastError, CastErrorKind, Casted, DateTimeCaster, FloatCaster,
    IntCaster, StringCaster, Tokens, TypeCaster, UuidCaster,
};
pub use descriptor::{ClassDescriptor, FieldRule};
pub use dynamic::{DynamicObject, FieldDef};
pub use error::{Error, Result};
pub use failure::{Failure, FailureList};
pub use identifiers::{normalize, normalize_pascal};
pub use object::{FromValue, Hydratable};
pub use registry::{Condition, ConditionRegistry, Registry, RegistryEntry, Source, SourceRegistry};
pub use value::Value;

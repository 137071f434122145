//! Metadata caching for the hydrator.
//!
//! Resolving a class's annotations into a [`ClassDescriptor`] is done once and
//! the result stored in a key/value backend, so later hydrations of the same
//! class skip resolution entirely.
//!
//! - [`CacheBackend`] is the collaborator contract: any store with
//!   get and put-with-expiry over JSON payloads.
//! - [`MemoryCache`] is a thread-safe in-process backend.
//! - [`MetadataCache`] keys descriptors by normalized class name and treats
//!   foreign or corrupt payloads as misses.
//!
//! [`ClassDescriptor`]: hydrator_core::ClassDescriptor

pub mod backend;
pub mod memory;
pub mod metadata;

pub use backend::CacheBackend;
pub use memory::MemoryCache;
pub use metadata::{DEFAULT_PREFIX, MetadataCache};

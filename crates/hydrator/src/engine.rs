//! The hydration engine.
//!
//! [`Hydrator`] looks up (or resolves and caches) the descriptor of an
//! object's class, then runs every rule of every field:
//!
//! 1. Re-check the rule against the current registries.
//! 2. Skip the rule when any of its conditions does not hold.
//! 3. Read each source in order. Null and empty-list values are skipped;
//!    other values go through array-style extraction and the caster. A
//!    rejected cast is recorded as a [`Failure`] and leaves the running
//!    value alone; anything else replaces it.
//! 4. Write the running value to the field unless it is null. A value the
//!    field's type cannot hold is recorded as a [`Failure`] too.
//!
//! Only configuration errors abort a call. Bad data never does.

use std::sync::Arc;

use hydrator_cache::{CacheBackend, MetadataCache};
use hydrator_core::{
    Annotation, Cast, ClassDescriptor, ConditionRegistry, Error, Failure, FailureList, FieldRule,
    Hydratable, Result, SourceRegistry, Value, extract_with,
};

use crate::annotations::AnnotationReader;
use crate::config::HydratorConfig;
use crate::resolver::MetadataResolver;

/// Message template for a value the field's type cannot hold.
pub const FIELD_TYPE_MISMATCH: &str = "Value does not fit field type %expected%: got %found%";

/// Hydrates objects from named sources.
///
/// A `Hydrator` holds no per-call state and can be shared between threads;
/// each call works against the registries it is given.
///
/// # Example
///
/// ```
/// use hydrator::{
///     CastDirective, DynamicObject, FieldDef, FromDirective, Hydrator, HydratorConfig, Source,
///     SourceRegistry, Value,
/// };
///
/// let mut sources = SourceRegistry::new();
/// sources.add("query", Source::keyed([("age", "42")])).unwrap();
///
/// let mut signup = DynamicObject::anonymous();
/// signup.add_field(
///     FieldDef::new("age")
///         .annotate(FromDirective::sources(["query"]))
///         .annotate(CastDirective::int()),
/// );
///
/// let hydrator = Hydrator::new(HydratorConfig::default());
/// let failures = hydrator.hydrate(&mut signup, &sources, None).unwrap();
///
/// assert!(failures.is_empty());
/// assert_eq!(signup.get("age"), Some(&Value::Int(42)));
/// ```
#[derive(Clone, Default)]
pub struct Hydrator {
    config: HydratorConfig,
    cache: Option<MetadataCache>,
    reader: Option<Arc<dyn AnnotationReader>>,
}

impl std::fmt::Debug for Hydrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hydrator")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("has_annotation_reader", &self.reader.is_some())
            .finish()
    }
}

impl Hydrator {
    /// Create a hydrator without a cache or annotation reader.
    pub fn new(config: HydratorConfig) -> Self {
        Self {
            config,
            cache: None,
            reader: None,
        }
    }

    /// Cache class descriptors in `backend`.
    pub fn with_cache(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(MetadataCache::new(backend).with_prefix(&self.config.cache_key_prefix));
        self
    }

    /// Read field annotations from `reader` in addition to the object's own.
    pub fn with_annotation_reader(mut self, reader: impl AnnotationReader + 'static) -> Self {
        self.reader = Some(Arc::new(reader));
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &HydratorConfig {
        &self.config
    }

    /// Get the metadata cache, if one is configured.
    pub fn cache(&self) -> Option<&MetadataCache> {
        self.cache.as_ref()
    }

    /// Hydrate `object`, returning the failures of this call.
    pub fn hydrate<T: Hydratable + ?Sized>(
        &self,
        object: &mut T,
        sources: &SourceRegistry,
        conditions: Option<&ConditionRegistry>,
    ) -> Result<FailureList> {
        let mut failures = FailureList::new();
        self.hydrate_into(object, sources, conditions, &mut failures)?;
        Ok(failures)
    }

    /// Hydrate `object`, appending failures to an existing list.
    ///
    /// The list is never cleared, so one list can collect the failures of
    /// several objects.
    #[tracing::instrument(
        level = "debug",
        target = "hydrator::engine",
        skip_all,
        fields(class = object.class_name())
    )]
    pub fn hydrate_into<T: Hydratable + ?Sized>(
        &self,
        object: &mut T,
        sources: &SourceRegistry,
        conditions: Option<&ConditionRegistry>,
        failures: &mut FailureList,
    ) -> Result<()> {
        let no_conditions = ConditionRegistry::new();
        let conditions = conditions.unwrap_or(&no_conditions);

        tracing::debug!(target: "hydrator::engine", "Attempting to hydrate object");

        let descriptor = self.descriptor_for(&*object, sources, conditions)?;

        tracing::debug!(
            target: "hydrator::engine",
            properties = descriptor.len(),
            "Object has hydratable properties"
        );

        let resolver = MetadataResolver::new(sources, conditions);
        for rule in descriptor.rules() {
            self.hydrate_rule(object, rule, &resolver, sources, conditions, failures)?;
        }
        Ok(())
    }

    /// The descriptor for an object's class.
    ///
    /// Named classes are read from the cache when possible and cached after
    /// resolution. Anonymous objects are resolved on every call.
    pub fn descriptor_for<T: Hydratable + ?Sized>(
        &self,
        object: &T,
        sources: &SourceRegistry,
        conditions: &ConditionRegistry,
    ) -> Result<ClassDescriptor> {
        let class_name = object.class_name();
        let cache = self.cache.as_ref().filter(|_| !object.is_anonymous());

        if let Some(cache) = cache {
            let cached = cache.get(class_name)?;
            if !cached.is_empty_sentinel() {
                return Ok(cached);
            }
        }

        let fields: Vec<(&str, Vec<Annotation>)> = object
            .field_names()
            .into_iter()
            .map(|field| (field, self.annotations_for(object, field)))
            .collect();
        let descriptor = MetadataResolver::new(sources, conditions).resolve(class_name, fields)?;

        if let Some(cache) = cache {
            cache.put(class_name, &descriptor, self.config.cache_ttl)?;
        }
        Ok(descriptor)
    }

    fn annotations_for<T: Hydratable + ?Sized>(&self, object: &T, field: &str) -> Vec<Annotation> {
        let mut annotations = object.annotations(field);
        if let Some(reader) = &self.reader {
            annotations.extend(reader.annotations(object.class_name(), field));
        }
        annotations
    }

    fn hydrate_rule<T: Hydratable + ?Sized>(
        &self,
        object: &mut T,
        rule: &FieldRule,
        resolver: &MetadataResolver<'_>,
        sources: &SourceRegistry,
        conditions: &ConditionRegistry,
        failures: &mut FailureList,
    ) -> Result<()> {
        if self.config.revalidate_rules {
            resolver.validate_rule(rule)?;
        }

        for name in rule.conditions() {
            let condition = conditions.get(name).ok_or_else(|| Error::UnknownCondition {
                name: name.clone(),
                context: rule.location(),
            })?;
            if !condition.holds() {
                tracing::debug!(
                    target: "hydrator::engine",
                    property = rule.property(),
                    condition = name.as_str(),
                    "Condition does not hold, skipping rule"
                );
                return Ok(());
            }
        }

        let mut current = Value::Null;
        let mut supplier: Option<&str> = None;
        for name in rule.sources() {
            let source = sources.get(name).ok_or_else(|| Error::UnknownSource {
                name: name.clone(),
                context: rule.location(),
            })?;

            tracing::trace!(
                target: "hydrator::engine",
                source = name.as_str(),
                field = rule.field(),
                "Reading source"
            );

            let fetched = source.fetch(rule.field()).map_err(|message| Error::Source {
                name: name.clone(),
                message,
            })?;
            if fetched.is_absent() {
                continue;
            }

            let data = extract_with(rule.array_styles(), &fetched);
            let Some(caster) = rule.caster() else {
                current = data;
                supplier = Some(name.as_str());
                continue;
            };

            let casted = caster.cast(&data, &Value::Null)?;
            if let Some(error) = casted.error() {
                tracing::debug!(
                    target: "hydrator::engine",
                    source = name.as_str(),
                    field = rule.field(),
                    error = error.message(),
                    "Cast failed"
                );
                failures.push(Failure::from_cast_error(rule.field(), data, name, error));
            } else {
                current = casted.into_value();
                supplier = Some(name.as_str());
            }
        }

        if current.is_null() {
            tracing::debug!(
                target: "hydrator::engine",
                property = rule.property(),
                "No value found, property unchanged"
            );
            return Ok(());
        }

        tracing::debug!(
            target: "hydrator::engine",
            property = rule.property(),
            value = %current,
            "Setting property"
        );
        match object.set_field(rule.property(), current.clone()) {
            Ok(()) => Ok(()),
            Err(Error::TypeMismatch {
                expected, found, ..
            }) => {
                tracing::debug!(
                    target: "hydrator::engine",
                    property = rule.property(),
                    expected,
                    found,
                    "Value does not fit the property type"
                );
                failures.push(
                    Failure::new(rule.field())
                        .with_input_value(current)
                        .with_message(FIELD_TYPE_MISMATCH)
                        .with_token("expected", expected)
                        .with_token("found", found)
                        .with_source(supplier.unwrap_or_default()),
                );
                Ok(())
            }
            Err(e) => Err(e.with_context(rule.location())),
        }
    }
}

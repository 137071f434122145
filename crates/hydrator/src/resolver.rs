//! Turning raw field annotations into a [`ClassDescriptor`].

use hydrator_core::{
    Annotation, ArrayStyle, Cast, CastDirective, ClassDescriptor, ConditionRegistry, Error,
    FieldRule, FromDirective, Result, SourceRegistry, TypeCaster,
};

/// Builds and checks [`FieldRule`]s against a pair of registries.
///
/// Every source and condition a rule names must be registered, and every
/// array style must be recognized. The resolver never mutates the
/// annotations it is given.
#[derive(Debug, Clone, Copy)]
pub struct MetadataResolver<'a> {
    sources: &'a SourceRegistry,
    conditions: &'a ConditionRegistry,
}

impl<'a> MetadataResolver<'a> {
    /// Create a resolver checking against these registries.
    pub fn new(sources: &'a SourceRegistry, conditions: &'a ConditionRegistry) -> Self {
        Self {
            sources,
            conditions,
        }
    }

    /// Resolve every field of a class.
    ///
    /// Fields without a from-directive contribute no rules.
    pub fn resolve<I, S>(&self, class_name: &str, fields: I) -> Result<ClassDescriptor>
    where
        I: IntoIterator<Item = (S, Vec<Annotation>)>,
        S: AsRef<str>,
    {
        let mut descriptor = ClassDescriptor::new(class_name);
        for (property, annotations) in fields {
            for rule in self.resolve_field(class_name, property.as_ref(), &annotations)? {
                descriptor.add(rule)?;
            }
        }

        tracing::debug!(
            target: "hydrator::resolver",
            class = class_name,
            fields = descriptor.len(),
            rules = descriptor.rule_count(),
            "Resolved class descriptor"
        );
        Ok(descriptor)
    }

    /// Resolve the annotations of one field into its rules.
    ///
    /// At most one cast directive is allowed; its caster applies to every
    /// rule of the field.
    pub fn resolve_field(
        &self,
        class_name: &str,
        property: &str,
        annotations: &[Annotation],
    ) -> Result<Vec<FieldRule>> {
        let context = format!("{class_name}::{property}");

        let mut cast: Option<&CastDirective> = None;
        let mut from: Vec<&FromDirective> = Vec::new();
        for annotation in annotations {
            match annotation {
                Annotation::Cast(directive) => {
                    if cast.replace(directive).is_some() {
                        return Err(Error::DuplicateCastDirective { context });
                    }
                }
                Annotation::From(directive) => from.push(directive),
            }
        }

        if from.is_empty() {
            return Ok(Vec::new());
        }

        let caster = cast
            .map(|directive| resolve_caster(&context, directive))
            .transpose()?;

        from.into_iter()
            .map(|directive| {
                if directive.sources.is_empty() {
                    return Err(Error::configuration(format!(
                        "{context} must name at least one source"
                    )));
                }
                self.validate_sources(&context, &directive.sources)?;
                self.validate_conditions(&context, &directive.conditions)?;
                let styles = validate_array_styles(&context, &directive.array_styles)?;

                let mut rule = FieldRule::new(class_name, property, directive.sources.clone())
                    .with_field(directive.field.clone().unwrap_or_default())
                    .with_conditions(directive.conditions.clone())
                    .with_array_styles(styles);
                if let Some(caster) = &caster {
                    rule = rule.with_caster(caster.clone());
                }
                Ok(rule)
            })
            .collect()
    }

    /// Check that every named source is registered.
    pub fn validate_sources(&self, context: &str, names: &[String]) -> Result<()> {
        match names.iter().find(|name| !self.sources.contains(name)) {
            Some(name) => Err(Error::UnknownSource {
                name: name.clone(),
                context: context.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Check that every named condition is registered.
    pub fn validate_conditions(&self, context: &str, names: &[String]) -> Result<()> {
        match names.iter().find(|name| !self.conditions.contains(name)) {
            Some(name) => Err(Error::UnknownCondition {
                name: name.clone(),
                context: context.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Check an already-built rule against the current registries.
    pub fn validate_rule(&self, rule: &FieldRule) -> Result<()> {
        let context = rule.location();
        if rule.sources().is_empty() {
            return Err(Error::configuration(format!(
                "{context} must name at least one source"
            )));
        }
        self.validate_sources(&context, rule.sources())?;
        self.validate_conditions(&context, rule.conditions())
    }
}

/// Parse array style tokens, dropping duplicates.
pub fn validate_array_styles(context: &str, tokens: &[String]) -> Result<Vec<ArrayStyle>> {
    let mut styles = Vec::with_capacity(tokens.len());
    for token in tokens {
        let style = ArrayStyle::parse(token).ok_or_else(|| Error::UnknownArrayStyle {
            name: token.clone(),
            context: context.to_string(),
        })?;
        if !styles.contains(&style) {
            styles.push(style);
        }
    }
    Ok(styles)
}

fn resolve_caster(context: &str, directive: &CastDirective) -> Result<TypeCaster> {
    let caster = TypeCaster::from_directive(directive).map_err(|e| match e {
        Error::UnknownCastKind { name, .. } => Error::UnknownCastKind {
            name,
            context: context.to_string(),
        },
        other => other.with_context(context),
    })?;

    // Hydration casts with a null default.
    if !caster.allow_null() {
        return Err(Error::configuration(format!(
            "{context}: {} cast must allow null to be used for hydration",
            caster.kind_name()
        )));
    }
    Ok(caster)
}

use serde::{Deserialize, Serialize};

use super::{Cast, CastError, CastErrorKind, Casted, TypeCaster, check_default};
use crate::error::Result;
use crate::value::Value;

/// Casts to a list, optionally checking every element.
///
/// A scalar input becomes a one-element list. With element casters, each
/// element is tried against them in order and the first non-null, error-free
/// result replaces it. One bad element rejects the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayCaster {
    pub allow_null: bool,
    /// Element casters; empty accepts any element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub of: Vec<TypeCaster>,
}

impl Default for ArrayCaster {
    fn default() -> Self {
        Self {
            allow_null: true,
            of: Vec::new(),
        }
    }
}

impl ArrayCaster {
    /// Create a caster with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether null passes through.
    pub fn nullable(mut self, allow: bool) -> Self {
        self.allow_null = allow;
        self
    }

    /// Add an element caster.
    pub fn of(mut self, caster: impl Into<TypeCaster>) -> Self {
        self.of.push(caster.into());
        self
    }

    fn cast_element(&self, element: &Value) -> Result<Option<Value>> {
        for candidate in &self.of {
            let casted = candidate.cast(element, &Value::Null)?;
            if !casted.has_errored() && !casted.value().is_null() {
                return Ok(Some(casted.into_value()));
            }
        }
        Ok(None)
    }
}

fn join_indexes(indexes: &[usize]) -> String {
    indexes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl Cast for ArrayCaster {
    fn allow_null(&self) -> bool {
        self.allow_null
    }

    fn coerce(&self, value: &Value, default: &Value) -> Result<Casted> {
        check_default(default, "list", |d| matches!(d, Value::List(_)))?;

        let items = match value {
            Value::List(items) => items.clone(),
            other => vec![other.clone()],
        };

        if self.of.is_empty() {
            return Ok(Casted::ok(Value::List(items)));
        }

        let mut converted = Vec::with_capacity(items.len());
        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match self.cast_element(item)? {
                Some(element) => {
                    valid.push(index);
                    converted.push(element);
                }
                None => invalid.push(index),
            }
        }

        if invalid.is_empty() {
            return Ok(Casted::ok(Value::List(converted)));
        }

        Ok(Casted::rejected(
            default.clone(),
            CastError::new(CastErrorKind::ArrayContentsInvalid)
                .token("validCount", valid.len().to_string())
                .token("totalCount", items.len().to_string())
                .token("validItemsList", join_indexes(&valid))
                .token("invalidItemsList", join_indexes(&invalid)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::{BoolCaster, IntCaster};
    use crate::error::Error;

    #[test]
    fn test_wraps_scalars() {
        let casted = ArrayCaster::new().cast(&Value::from("x"), &Value::Null).unwrap();
        assert_eq!(casted.value(), &Value::from(vec!["x"]));
    }

    #[test]
    fn test_untyped_keeps_elements() {
        let list = Value::List(vec![Value::Int(1), Value::from("a"), Value::Null]);
        let casted = ArrayCaster::new().cast(&list, &Value::Null).unwrap();
        assert_eq!(casted.value(), &list);
    }

    #[test]
    fn test_elements_are_converted() {
        let caster = ArrayCaster::new().of(IntCaster::new());
        let casted = caster
            .cast(&Value::from(vec!["1", "2,000", "3"]), &Value::Null)
            .unwrap();
        assert_eq!(casted.value(), &Value::from(vec![1, 2000, 3]));
    }

    #[test]
    fn test_first_matching_candidate_wins() {
        let caster = ArrayCaster::new().of(IntCaster::new()).of(BoolCaster::new());
        let casted = caster
            .cast(&Value::from(vec!["5", "yes"]), &Value::Null)
            .unwrap();
        assert_eq!(
            casted.value(),
            &Value::List(vec![Value::Int(5), Value::Bool(true)])
        );
    }

    #[test]
    fn test_invalid_elements_reject_the_list() {
        let caster = ArrayCaster::new().of(IntCaster::new());
        let default = Value::from(vec![0]);
        let casted = caster
            .cast(&Value::from(vec!["1", "x", "3", "y"]), &default)
            .unwrap();

        assert!(casted.has_errored());
        assert_eq!(casted.value(), &default);
        let tokens = casted.error_tokens().unwrap();
        assert_eq!(tokens["validCount"], "2");
        assert_eq!(tokens["totalCount"], "4");
        assert_eq!(tokens["validItemsList"], "0,2");
        assert_eq!(tokens["invalidItemsList"], "1,3");
    }

    #[test]
    fn test_null_elements_are_invalid() {
        let caster = ArrayCaster::new().of(IntCaster::new());
        let casted = caster
            .cast(&Value::List(vec![Value::Int(1), Value::Null]), &Value::Null)
            .unwrap();
        assert_eq!(casted.error_tokens().unwrap()["invalidItemsList"], "1");
    }

    #[test]
    fn test_strict_element_caster_is_a_configuration_error() {
        let caster = ArrayCaster::new().of(IntCaster::new().nullable(false));
        assert!(matches!(
            caster.cast(&Value::from(vec!["1"]), &Value::Null),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_default_must_be_list() {
        assert!(matches!(
            ArrayCaster::new().cast(&Value::from("x"), &Value::from("y")),
            Err(Error::TypeMismatch { expected: "list", .. })
        ));
    }
}

use serde::{Deserialize, Serialize};

use super::{Cast, CastError, CastErrorKind, Casted, check_default};
use crate::error::Result;
use crate::value::Value;

/// Casts text and numbers to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringCaster {
    pub allow_null: bool,
}

impl Default for StringCaster {
    fn default() -> Self {
        Self { allow_null: true }
    }
}

impl StringCaster {
    /// Create a caster with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether null passes through.
    pub fn nullable(mut self, allow: bool) -> Self {
        self.allow_null = allow;
        self
    }
}

impl Cast for StringCaster {
    fn allow_null(&self) -> bool {
        self.allow_null
    }

    fn coerce(&self, value: &Value, default: &Value) -> Result<Casted> {
        check_default(default, "text", |d| matches!(d, Value::Text(_)))?;

        match value {
            Value::Text(_) | Value::Int(_) | Value::Float(_) => Ok(Casted::ok(
                value.scalar_text().map_or(Value::Null, Value::Text),
            )),
            _ => Ok(Casted::rejected(
                default.clone(),
                CastError::new(CastErrorKind::OnlyStringsOrNumerics),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn cast(value: impl Into<Value>) -> Casted {
        StringCaster::new().cast(&value.into(), &Value::Null).unwrap()
    }

    #[test]
    fn test_scalars_become_text() {
        assert_eq!(cast("abc").value(), &Value::from("abc"));
        assert_eq!(cast(42).value(), &Value::from("42"));
        assert_eq!(cast(3.0).value(), &Value::from("3"));
        assert_eq!(cast(0.25).value(), &Value::from("0.25"));
    }

    #[test]
    fn test_rejects_bools_and_collections() {
        for value in [Value::Bool(true), Value::from(vec!["a"])] {
            let casted = StringCaster::new()
                .cast(&value, &Value::from("fallback"))
                .unwrap();
            assert!(casted.has_errored());
            assert_eq!(casted.value(), &Value::from("fallback"));
            assert_eq!(
                casted.error_message(),
                Some("Only strings or numerics are accepted")
            );
        }
    }

    #[test]
    fn test_default_must_be_text() {
        assert!(matches!(
            StringCaster::new().cast(&Value::from("x"), &Value::Int(1)),
            Err(Error::TypeMismatch { expected: "text", found: "int", .. })
        ));
    }
}

use serde::{Deserialize, Serialize};

use super::{Cast, CastError, CastErrorKind, Casted, check_default};
use crate::error::Result;
use crate::value::Value;

/// Canonicalizes UUID text to lower-case 8-4-4-4-12 form.
///
/// Hyphens may appear anywhere in the input; they are stripped before
/// the remaining characters are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UuidCaster {
    pub allow_null: bool,
}

impl Default for UuidCaster {
    fn default() -> Self {
        Self { allow_null: true }
    }
}

impl UuidCaster {
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

impl Cast for UuidCaster {
    fn allow_null(&self) -> bool {
        self.allow_null
    }

    fn coerce(&self, value: &Value, default: &Value) -> Result<Casted> {
        check_default(default, "text", |d| matches!(d, Value::Text(_)))?;

        let Some(text) = value.is_string_or_numeric().then(|| value.scalar_text()).flatten()
        else {
            return Ok(Casted::rejected(
                default.clone(),
                CastError::new(CastErrorKind::OnlyStringsOrNumerics),
            ));
        };

        let hex: String = text
            .to_lowercase()
            .chars()
            .filter(|c| *c != '-')
            .collect();

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Casted::rejected(
                default.clone(),
                CastError::new(CastErrorKind::UuidInvalidCharacters),
            ));
        }
        if hex.len() != 32 {
            return Ok(Casted::rejected(
                default.clone(),
                CastError::new(CastErrorKind::UuidWrongLength),
            ));
        }

        let canonical = format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        );
        Ok(Casted::ok(Value::Text(canonical)))
    }
}

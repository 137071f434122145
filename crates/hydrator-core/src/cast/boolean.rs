use serde::{Deserialize, Serialize};

use super::{Cast, CastError, CastErrorKind, Casted, check_default};
use crate::error::Result;
use crate::value::Value;

const TRUES: [&str; 4] = ["1", "true", "on", "yes"];
const FALSES: [&str; 5] = ["0", "false", "off", "no", ""];

/// Casts booleans and boolean-like text or numbers to `bool`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoolCaster {
    pub allow_null: bool,
}

impl Default for BoolCaster {
    fn default() -> Self {
        Self { allow_null: true }
    }
}

impl BoolCaster {
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

impl Cast for BoolCaster {
    fn allow_null(&self) -> bool {
        self.allow_null
    }

    fn coerce(&self, value: &Value, default: &Value) -> Result<Casted> {
        check_default(default, "bool", |d| matches!(d, Value::Bool(_)))?;

        if let Value::Bool(b) = value {
            return Ok(Casted::ok(Value::Bool(*b)));
        }

        let Some(text) = value
            .is_string_or_numeric()
            .then(|| value.scalar_text())
            .flatten()
        else {
            return Ok(Casted::rejected(
                default.clone(),
                CastError::new(CastErrorKind::OnlyBoolsStringsOrNumerics),
            ));
        };

        let lowered = text.trim().to_lowercase();
        if TRUES.contains(&lowered.as_str()) {
            Ok(Casted::ok(Value::Bool(true)))
        } else if FALSES.contains(&lowered.as_str()) {
            Ok(Casted::ok(Value::Bool(false)))
        } else {
            Ok(Casted::rejected(
                default.clone(),
                CastError::new(CastErrorKind::BoolFormatRejected)
                    .token("trues", "1,true,on,yes")
                    .token("falses", "0,false,off,no"),
            ))
        }
    }
}

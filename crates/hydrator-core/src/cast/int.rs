use serde::{Deserialize, Serialize};

use super::{Cast, CastError, CastErrorKind, Casted, check_default};
use crate::error::{Error, Result};
use crate::patterns::{INTEGER, matches_pattern};
use crate::value::Value;

/// Casts text and numbers to a bounded `i64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntCaster {
    pub allow_null: bool,
    pub min: i64,
    pub max: i64,
    /// Thousands separator stripped from text before parsing.
    pub digits_separator: String,
}

impl Default for IntCaster {
    fn default() -> Self {
        Self {
            allow_null: true,
            min: i64::MIN,
            max: i64::MAX,
            digits_separator: ",".to_string(),
        }
    }
}

impl IntCaster {
    /// Create a caster with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether null passes through.
    pub fn nullable(mut self, allow: bool) -> Self {
        self.allow_null = allow;
        self
    }

    /// Set the inclusive lower bound.
    pub fn min(mut self, min: i64) -> Self {
        self.min = min;
        self
    }

    /// Set the inclusive upper bound.
    pub fn max(mut self, max: i64) -> Self {
        self.max = max;
        self
    }

    /// Set the thousands separator.
    pub fn digits_separator(mut self, separator: impl Into<String>) -> Self {
        self.digits_separator = separator.into();
        self
    }

    fn parse(&self, value: &Value) -> Option<i64> {
        match value {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                // Saturating `as` would silently clamp out-of-range floats.
                if *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            Value::Text(text) => {
                let stripped = if self.digits_separator.is_empty() {
                    text.clone()
                } else {
                    text.replace(&self.digits_separator, "")
                };
                let trimmed = stripped.trim();
                if matches_pattern(trimmed, INTEGER) {
                    trimmed.parse().ok()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn format_rejected(&self) -> CastError {
        CastError::new(CastErrorKind::DecimalFormatRejected)
            .token("digitsSeparator", self.digits_separator.clone())
    }
}

impl Cast for IntCaster {
    fn allow_null(&self) -> bool {
        self.allow_null
    }

    fn coerce(&self, value: &Value, default: &Value) -> Result<Casted> {
        check_default(default, "int", |d| matches!(d, Value::Int(_)))?;
        if self.min > self.max {
            return Err(Error::configuration(format!(
                "int bounds are inverted: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if let Value::Int(d) = default {
            if *d < self.min || *d > self.max {
                return Err(Error::configuration(format!(
                    "int default {d} is outside {}..={}",
                    self.min, self.max
                )));
            }
        }

        if !value.is_string_or_numeric() {
            return Ok(Casted::rejected(
                default.clone(),
                CastError::new(CastErrorKind::OnlyStringsOrNumerics),
            ));
        }

        let Some(parsed) = self.parse(value) else {
            return Ok(Casted::rejected(default.clone(), self.format_rejected()));
        };

        if parsed < self.min || parsed > self.max {
            return Ok(Casted::rejected(
                default.clone(),
                CastError::new(CastErrorKind::DecimalOutOfRange)
                    .token("min", self.min.to_string())
                    .token("max", self.max.to_string()),
            ));
        }

        Ok(Casted::ok(Value::Int(parsed)))
    }
}

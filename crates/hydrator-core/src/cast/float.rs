use serde::{Deserialize, Serialize};

use super::{Cast, CastError, CastErrorKind, Casted, check_default};
use crate::error::Result;
use crate::patterns::{FLOAT, matches_pattern};
use crate::value::Value;

/// Casts text and numbers to `f64`, with configurable notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatCaster {
    pub allow_null: bool,
    /// Decimal places to round to, half away from zero. `None` keeps full precision.
    pub precision: Option<i32>,
    pub decimal_separator: String,
    pub digits_separator: String,
}

impl Default for FloatCaster {
    fn default() -> Self {
        Self {
            allow_null: true,
            precision: None,
            decimal_separator: ".".to_string(),
            digits_separator: ",".to_string(),
        }
    }
}

impl FloatCaster {
    /// Create a caster with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether null passes through.
    pub fn nullable(mut self, allow: bool) -> Self {
        self.allow_null = allow;
        self
    }

    /// Round results to this many decimal places.
    pub fn precision(mut self, places: i32) -> Self {
        self.precision = Some(places);
        self
    }

    /// Set the decimal separator.
    pub fn decimal_separator(mut self, separator: impl Into<String>) -> Self {
        self.decimal_separator = separator.into();
        self
    }

    /// Set the thousands separator.
    pub fn digits_separator(mut self, separator: impl Into<String>) -> Self {
        self.digits_separator = separator.into();
        self
    }

    fn parse_text(&self, text: &str) -> Option<f64> {
        let mut normalized = if self.digits_separator.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.digits_separator, "")
        };
        if self.decimal_separator != "." {
            if normalized.contains('.') {
                return None;
            }
            normalized = normalized.replace(&self.decimal_separator, ".");
        }
        let trimmed = normalized.trim();
        if !matches_pattern(trimmed, FLOAT) {
            return None;
        }
        trimmed.parse::<f64>().ok()
    }

    fn round(&self, value: f64) -> f64 {
        let Some(places) = self.precision else {
            return value;
        };
        let factor = 10_f64.powi(places);
        let rounded = (value * factor).round() / factor;
        if rounded.is_finite() { rounded } else { value }
    }
}

impl Cast for FloatCaster {
    fn allow_null(&self) -> bool {
        self.allow_null
    }

    fn coerce(&self, value: &Value, default: &Value) -> Result<Casted> {
        check_default(default, "float", |d| matches!(d, Value::Float(_)))?;

        let parsed = match value {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Text(text) => self.parse_text(text),
            _ => {
                return Ok(Casted::rejected(
                    default.clone(),
                    CastError::new(CastErrorKind::OnlyStringsOrNumerics),
                ));
            }
        };

        match parsed.filter(|f| f.is_finite()) {
            Some(f) => Ok(Casted::ok(Value::Float(self.round(f)))),
            None => Ok(Casted::rejected(
                default.clone(),
                CastError::new(CastErrorKind::FloatFormatRejected)
                    .token("decimalSeparator", self.decimal_separator.clone())
                    .token("digitsSeparator", self.digits_separator.clone()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn cast(caster: &FloatCaster, value: impl Into<Value>) -> Casted {
        caster.cast(&value.into(), &Value::Null).unwrap()
    }

    fn assert_float(casted: &Casted, expected: f64) {
        let Value::Float(actual) = casted.value() else {
            panic!("expected a float, got {:?}", casted.value());
        };
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn test_accepts_float_forms() {
        let caster = FloatCaster::new();
        assert_float(&cast(&caster, "1"), 1.0);
        assert_float(&cast(&caster, "1.34"), 1.34);
        assert_float(&cast(&caster, "-123"), -123.0);
        assert_float(&cast(&caster, "1.2e3"), 1200.0);
        assert_float(&cast(&caster, "7E-10"), 7e-10);
        assert_float(&cast(&caster, 5), 5.0);
        assert_float(&cast(&caster, 2.5), 2.5);
    }

    #[test]
    fn test_digits_separator_is_stripped_anywhere() {
        let caster = FloatCaster::new();
        assert_float(&cast(&caster, "456,123,346.543,435,435,346"), 456_123_346.543_435_435_346);
    }

    #[test]
    fn test_rejects_malformed_text() {
        let caster = FloatCaster::new();
        for bad in ["xyz", "1.2.3.4", "1,234.234.23", "", "inf", "1e400"] {
            let casted = cast(&caster, bad);
            assert!(casted.has_errored(), "{bad:?} should be rejected");
            assert_eq!(
                casted.error().map(CastError::kind),
                Some(CastErrorKind::FloatFormatRejected)
            );
        }

        let tokens = cast(&caster, "xyz").error_tokens().cloned().unwrap();
        assert_eq!(tokens["decimalSeparator"], ".");
        assert_eq!(tokens["digitsSeparator"], ",");
    }

    #[test]
    fn test_custom_separators() {
        let caster = FloatCaster::new().digits_separator("j");
        assert_float(&cast(&caster, "123j456j23.45"), 12_345_623.45);

        let caster = FloatCaster::new().decimal_separator("Q");
        assert_float(&cast(&caster, "123,456,23Q45"), 12_345_623.45);
        assert!(cast(&caster, "12.5").has_errored());
    }

    #[test]
    fn test_precision_rounds_half_away_from_zero() {
        let caster = FloatCaster::new().precision(2);
        assert_float(&cast(&caster, "1.005001"), 1.01);
        assert_float(&cast(&caster, "2.3451"), 2.35);
        assert_float(&cast(&caster, "-2.3451"), -2.35);

        let whole = FloatCaster::new().precision(0);
        assert_float(&cast(&whole, "2.5"), 3.0);
        assert_float(&cast(&whole, "-2.5"), -3.0);
    }

    #[test]
    fn test_rejects_non_scalars() {
        let casted = FloatCaster::new()
            .cast(&Value::Bool(true), &Value::Float(1.5))
            .unwrap();
        assert_eq!(casted.value(), &Value::Float(1.5));
        assert_eq!(
            casted.error().map(CastError::kind),
            Some(CastErrorKind::OnlyStringsOrNumerics)
        );
    }

    #[test]
    fn test_default_must_be_float() {
        assert!(matches!(
            FloatCaster::new().cast(&Value::from("1"), &Value::Int(1)),
            Err(Error::TypeMismatch { expected: "float", .. })
        ));
    }
}

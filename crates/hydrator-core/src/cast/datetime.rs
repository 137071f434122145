use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{Cast, CastError, CastErrorKind, Casted};
use crate::error::{Error, Result};
use crate::patterns::{UNIX_SECONDS, matches_pattern};
use crate::value::Value;

const RANGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Casts RFC 3339, RFC 2822 and unix-seconds input to a UTC date-time.
///
/// `min` and `max` accept anything the caster itself accepts; they are
/// parsed on every cast so a bad bound surfaces as a configuration error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeCaster {
    pub allow_null: bool,
    pub min: Value,
    pub max: Value,
}

impl Default for DateTimeCaster {
    fn default() -> Self {
        Self {
            allow_null: true,
            min: Value::DateTime(DateTime::<Utc>::UNIX_EPOCH),
            max: Value::DateTime(default_max()),
        }
    }
}

fn default_max() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2999, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map_or(DateTime::<Utc>::MAX_UTC, |naive| naive.and_utc())
}

/// Parse `value` as a date-time.
///
/// Text is tried as RFC 3339, then RFC 2822, then unix seconds. Integers and
/// integral floats are unix seconds. Calendar overflow such as June 31 is
/// rejected rather than rolled over. Returns `None` for unparseable input
/// and for values that are not text, numbers or date-times.
pub fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::Int(secs) => from_unix(*secs),
        Value::Float(_) => value
            .scalar_text()
            .filter(|text| matches_pattern(text, UNIX_SECONDS))
            .and_then(|text| text.parse().ok())
            .and_then(from_unix),
        Value::Text(text) => parse_text(text.trim()),
        _ => None,
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if matches_pattern(text, UNIX_SECONDS) {
        return text.parse().ok().and_then(from_unix);
    }
    None
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

fn bound(value: &Value, name: &str) -> Result<DateTime<Utc>> {
    if !(value.is_string_or_numeric() || matches!(value, Value::DateTime(_))) {
        return Err(Error::type_mismatch("datetime", value.type_name()).with_context(name));
    }
    parse_datetime(value)
        .ok_or_else(|| Error::configuration(format!("datetime {name} {value} is not a valid date")))
}

impl DateTimeCaster {
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
    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = min.into();
        self
    }

    /// Set the inclusive upper bound.
    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = max.into();
        self
    }
}

impl Cast for DateTimeCaster {
    fn allow_null(&self) -> bool {
        self.allow_null
    }

    fn coerce(&self, value: &Value, default: &Value) -> Result<Casted> {
        let min = bound(&self.min, "min")?;
        let max = bound(&self.max, "max")?;
        if min > max {
            return Err(Error::configuration(format!(
                "datetime bounds are inverted: min {min} exceeds max {max}"
            )));
        }

        let fallback = if default.is_null() {
            Value::Null
        } else {
            let parsed = bound(default, "default")?;
            if parsed < min || parsed > max {
                return Err(Error::configuration(format!(
                    "datetime default {parsed} is outside {min} to {max}"
                )));
            }
            Value::DateTime(parsed)
        };

        if !(value.is_string_or_numeric() || matches!(value, Value::DateTime(_))) {
            return Ok(Casted::rejected(
                fallback,
                CastError::new(CastErrorKind::OnlyStringsOrNumerics),
            ));
        }

        let Some(parsed) = parse_datetime(value) else {
            return Ok(Casted::rejected(
                fallback,
                CastError::new(CastErrorKind::DateTimeFormatRejected),
            ));
        };

        if parsed < min || parsed > max {
            return Ok(Casted::rejected(
                fallback,
                CastError::new(CastErrorKind::DateTimeOutOfRange)
                    .token("min", min.format(RANGE_FORMAT).to_string())
                    .token("max", max.format(RANGE_FORMAT).to_string()),
            ));
        }

        Ok(Casted::ok(Value::DateTime(parsed)))
    }
}

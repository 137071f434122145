//! Type casting of raw source values.
//!
//! Every caster is a pure function of `(configuration, value, default)`:
//! a cast returns a [`Casted`] outcome carrying either the converted value
//! or the default together with a [`CastError`]. A rejected value is data,
//! not an `Err`; `Err` is reserved for misconfigured casters.

mod array;
mod boolean;
mod datetime;
mod float;
mod int;
mod string;
mod uuid;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotation::CastDirective;
use crate::error::{Error, Result};
use crate::identifiers::normalize;
use crate::value::Value;

pub use array::ArrayCaster;
pub use boolean::BoolCaster;
pub use datetime::{DateTimeCaster, parse_datetime};
pub use float::FloatCaster;
pub use int::IntCaster;
pub use string::StringCaster;
pub use uuid::UuidCaster;

/// Placeholder values substituted into a message template, keyed without
/// the surrounding `%`.
pub type Tokens = BTreeMap<String, String>;

// ============================================================================
// Cast errors
// ============================================================================

/// The reason a caster rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastErrorKind {
    /// Input was not text or a number.
    OnlyStringsOrNumerics,
    /// Input was not a boolean, text or a number.
    OnlyBoolsStringsOrNumerics,
    /// Text did not spell a recognised boolean.
    BoolFormatRejected,
    /// Text could not be parsed as a date-time.
    DateTimeFormatRejected,
    /// Date-time fell outside the configured bounds.
    DateTimeOutOfRange,
    /// Text was not a float in the configured notation.
    FloatFormatRejected,
    /// Text was not an integer in the configured notation.
    DecimalFormatRejected,
    /// Integer fell outside the configured bounds.
    DecimalOutOfRange,
    /// UUID contained non-hex characters.
    UuidInvalidCharacters,
    /// UUID did not have 32 hex digits.
    UuidWrongLength,
    /// Some array elements matched none of the element casters.
    ArrayContentsInvalid,
}

impl CastErrorKind {
    /// The message template, with `%token%` placeholders.
    pub const fn template(self) -> &'static str {
        match self {
            Self::OnlyStringsOrNumerics => "Only strings or numerics are accepted",
            Self::OnlyBoolsStringsOrNumerics => "Only booleans, strings or numerics are accepted",
            Self::BoolFormatRejected => {
                "Value must either be the boolean true (or %trues%) or false (or %falses%)"
            }
            Self::DateTimeFormatRejected => {
                "Unable to interpret as a valid date time in expected range - expected either an \
                 ISO8601/RFC3339 or RFC-2822 formatted date or unix datestamp"
            }
            Self::DateTimeOutOfRange => "Date must be between %min% and %max%",
            Self::FloatFormatRejected => {
                "Value must be a float using the decimal separator %decimalSeparator% \
                 and the optional digits separator %digitsSeparator%"
            }
            Self::DecimalFormatRejected => {
                "Value must be a decimal using the optional digits separator %digitsSeparator%"
            }
            Self::DecimalOutOfRange => "Decimal must be between %min% and %max%",
            Self::UuidInvalidCharacters => "Uuid contains invalid characters",
            Self::UuidWrongLength => "Uuid is the wrong length",
            Self::ArrayContentsInvalid => {
                "Array contains invalid items - only %validCount% out of %totalCount% \
                 items allowed. Acceptable items keys: \"%validItemsList%\", \
                 Invalid items keys: \"%invalidItemsList%\""
            }
        }
    }
}

/// Substitute `%key%` placeholders in `template`.
///
/// Placeholders without a token are left as they are.
pub fn render_template(template: &str, tokens: &Tokens) -> String {
    tokens
        .iter()
        .fold(template.to_string(), |message, (key, value)| {
            message.replace(&format!("%{key}%"), value)
        })
}

/// A rejected value: the reason plus the tokens for its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastError {
    kind: CastErrorKind,
    tokens: Tokens,
}

impl CastError {
    /// Create an error without tokens.
    pub fn new(kind: CastErrorKind) -> Self {
        Self {
            kind,
            tokens: Tokens::new(),
        }
    }

    /// Add a message token.
    pub fn token(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(key.into(), value.into());
        self
    }

    /// The rejection reason.
    pub const fn kind(&self) -> CastErrorKind {
        self.kind
    }

    /// The message template.
    pub const fn message(&self) -> &'static str {
        self.kind.template()
    }

    /// The message tokens.
    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// The message with its tokens substituted.
    pub fn rendered(&self) -> String {
        render_template(self.message(), &self.tokens)
    }
}

// ============================================================================
// Cast outcome
// ============================================================================

/// The outcome of one cast.
#[derive(Debug, Clone, PartialEq)]
pub struct Casted {
    value: Value,
    error: Option<CastError>,
}

impl Casted {
    /// A successful cast.
    pub fn ok(value: Value) -> Self {
        Self { value, error: None }
    }

    /// A rejected cast, falling back to `default`.
    pub fn rejected(default: Value, error: CastError) -> Self {
        Self {
            value: default,
            error: Some(error),
        }
    }

    /// The converted value, or the default when the cast was rejected.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the outcome, keeping the value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Whether the cast rejected its input.
    pub fn has_errored(&self) -> bool {
        self.error.is_some()
    }

    /// The rejection, if any.
    pub fn error(&self) -> Option<&CastError> {
        self.error.as_ref()
    }

    /// The message template of the rejection, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(CastError::message)
    }

    /// The message tokens of the rejection, if any.
    pub fn error_tokens(&self) -> Option<&Tokens> {
        self.error.as_ref().map(CastError::tokens)
    }
}

// ============================================================================
// Cast trait
// ============================================================================

/// A configured caster.
pub trait Cast {
    /// Whether null inputs pass through as null.
    fn allow_null(&self) -> bool;

    /// Convert `value`, falling back to `default` when it is rejected.
    ///
    /// Null handling has already been applied by [`Cast::cast`].
    fn coerce(&self, value: &Value, default: &Value) -> Result<Casted>;

    /// Cast a value.
    ///
    /// A null default requires a caster that allows null. A null value with
    /// null allowed yields null without error.
    fn cast(&self, value: &Value, default: &Value) -> Result<Casted> {
        if default.is_null() && !self.allow_null() {
            return Err(Error::configuration(
                "if the default value is null, nulls must be allowed on cast",
            ));
        }
        if value.is_null() && self.allow_null() {
            return Ok(Casted::ok(Value::Null));
        }
        self.coerce(value, default)
    }
}

/// Reject a default of the wrong type.
pub(crate) fn check_default(
    default: &Value,
    expected: &'static str,
    accepts: fn(&Value) -> bool,
) -> Result<()> {
    if default.is_null() || accepts(default) {
        Ok(())
    } else {
        Err(Error::type_mismatch(expected, default.type_name()))
    }
}

// ============================================================================
// Caster union
// ============================================================================

/// Any of the built-in casters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeCaster {
    Int(IntCaster),
    Float(FloatCaster),
    Bool(BoolCaster),
    String(StringCaster),
    Array(ArrayCaster),
    DateTime(DateTimeCaster),
    Uuid(UuidCaster),
}

impl TypeCaster {
    /// The caster kind, as written in cast directives.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TypeCaster::Int(_) => "int",
            TypeCaster::Float(_) => "float",
            TypeCaster::Bool(_) => "bool",
            TypeCaster::String(_) => "string",
            TypeCaster::Array(_) => "array",
            TypeCaster::DateTime(_) => "datetime",
            TypeCaster::Uuid(_) => "uuid",
        }
    }

    /// Build a caster from a directive.
    ///
    /// Kinds and option names are normalized and compared without regard to
    /// case, so `"DateTime"` and `"date_time"` both select the date-time
    /// caster and `allow_null` sets `allowNull`.
    pub fn from_directive(directive: &CastDirective) -> Result<Self> {
        let kind = normalize(&directive.kind).map_err(|_| Error::UnknownCastKind {
            name: directive.kind.clone(),
            context: "cast directive".to_string(),
        })?;

        let mut caster = match kind.to_ascii_lowercase().as_str() {
            "int" | "integer" | "decimal" => TypeCaster::Int(IntCaster::default()),
            "float" | "double" => TypeCaster::Float(FloatCaster::default()),
            "bool" | "boolean" => TypeCaster::Bool(BoolCaster::default()),
            "string" | "str" | "text" => TypeCaster::String(StringCaster::default()),
            "array" | "list" => TypeCaster::Array(ArrayCaster::default()),
            "datetime" => TypeCaster::DateTime(DateTimeCaster::default()),
            "uuid" => TypeCaster::Uuid(UuidCaster::default()),
            _ => {
                return Err(Error::UnknownCastKind {
                    name: directive.kind.clone(),
                    context: "cast directive".to_string(),
                });
            }
        };

        for (name, value) in &directive.options {
            let option = normalize(name)?.to_ascii_lowercase();
            caster.apply_option(name, &option, value)?;
        }

        if !directive.of.is_empty() {
            let kind_name = caster.kind_name();
            let TypeCaster::Array(array) = &mut caster else {
                return Err(Error::configuration(format!(
                    "only array casts accept element casters, not {kind_name}"
                )));
            };
            for element in &directive.of {
                array.of.push(TypeCaster::from_directive(element)?);
            }
        }

        Ok(caster)
    }

    fn apply_option(&mut self, name: &str, option: &str, value: &Value) -> Result<()> {
        if option == "allownull" {
            let allow = option_bool(name, value)?;
            match self {
                TypeCaster::Int(c) => c.allow_null = allow,
                TypeCaster::Float(c) => c.allow_null = allow,
                TypeCaster::Bool(c) => c.allow_null = allow,
                TypeCaster::String(c) => c.allow_null = allow,
                TypeCaster::Array(c) => c.allow_null = allow,
                TypeCaster::DateTime(c) => c.allow_null = allow,
                TypeCaster::Uuid(c) => c.allow_null = allow,
            }
            return Ok(());
        }

        match (self, option) {
            (TypeCaster::Int(c), "min") => c.min = option_int(name, value)?,
            (TypeCaster::Int(c), "max") => c.max = option_int(name, value)?,
            (TypeCaster::Int(c), "digitsseparator" | "digitseparator") => {
                c.digits_separator = option_text(name, value)?;
            }
            (TypeCaster::Float(c), "precision") => {
                c.precision = match value {
                    Value::Null => None,
                    other => Some(i32::try_from(option_int(name, other)?).map_err(|_| {
                        Error::configuration(format!("{name:?} is out of range: {other}"))
                    })?),
                };
            }
            (TypeCaster::Float(c), "decimalseparator") => {
                c.decimal_separator = option_text(name, value)?;
            }
            (TypeCaster::Float(c), "digitsseparator" | "digitseparator") => {
                c.digits_separator = option_text(name, value)?;
            }
            (TypeCaster::DateTime(c), "min") => c.min = value.clone(),
            (TypeCaster::DateTime(c), "max") => c.max = value.clone(),
            (caster, _) => {
                return Err(Error::configuration(format!(
                    "unknown option {name:?} for {} cast",
                    caster.kind_name()
                )));
            }
        }
        Ok(())
    }
}

fn option_bool(option: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::type_mismatch("bool", value.type_name()).with_context(option))
}

fn option_int(option: &str, value: &Value) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Error::type_mismatch("int", value.type_name()).with_context(option))
}

fn option_text(option: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::type_mismatch("text", value.type_name()).with_context(option))
}

impl Cast for TypeCaster {
    fn allow_null(&self) -> bool {
        match self {
            TypeCaster::Int(c) => c.allow_null(),
            TypeCaster::Float(c) => c.allow_null(),
            TypeCaster::Bool(c) => c.allow_null(),
            TypeCaster::String(c) => c.allow_null(),
            TypeCaster::Array(c) => c.allow_null(),
            TypeCaster::DateTime(c) => c.allow_null(),
            TypeCaster::Uuid(c) => c.allow_null(),
        }
    }

    fn coerce(&self, value: &Value, default: &Value) -> Result<Casted> {
        match self {
            TypeCaster::Int(c) => c.coerce(value, default),
            TypeCaster::Float(c) => c.coerce(value, default),
            TypeCaster::Bool(c) => c.coerce(value, default),
            TypeCaster::String(c) => c.coerce(value, default),
            TypeCaster::Array(c) => c.coerce(value, default),
            TypeCaster::DateTime(c) => c.coerce(value, default),
            TypeCaster::Uuid(c) => c.coerce(value, default),
        }
    }
}

macro_rules! impl_from_caster {
    ($($variant:ident($caster:ty)),* $(,)?) => {
        $(
            impl From<$caster> for TypeCaster {
                fn from(caster: $caster) -> Self {
                    TypeCaster::$variant(caster)
                }
            }
        )*
    };
}

impl_from_caster!(
    Int(IntCaster),
    Float(FloatCaster),
    Bool(BoolCaster),
    String(StringCaster),
    Array(ArrayCaster),
    DateTime(DateTimeCaster),
    Uuid(UuidCaster),
);

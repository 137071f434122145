//! The hydration target capability.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::annotation::Annotation;
use crate::error::{Error, Result};
use crate::value::Value;

/// An object whose fields can be written by name.
///
/// Usually implemented with `#[derive(Hydratable)]`, which generates a
/// setter table over the struct's named fields.
pub trait Hydratable {
    /// Fully qualified class name; the cache key for this object's metadata.
    fn class_name(&self) -> &str;

    /// Anonymous objects are resolved fresh on every call and never cached.
    fn is_anonymous(&self) -> bool {
        false
    }

    /// Declared fields, in declaration order.
    fn field_names(&self) -> Vec<&str>;

    /// Write a value into a declared field.
    ///
    /// Fails with [`Error::UnknownField`] for undeclared names and with
    /// [`Error::TypeMismatch`] when the value does not fit the field.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

    /// Annotations the object declares for one of its fields.
    fn annotations(&self, _field: &str) -> Vec<Annotation> {
        Vec::new()
    }
}

// ============================================================================
// FromValue
// ============================================================================

/// Conversion from a hydrated [`Value`] into a concrete field type.
pub trait FromValue: Sized {
    /// Convert, failing with [`Error::TypeMismatch`].
    fn from_value(value: Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::type_mismatch("bool", other.type_name())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(Error::type_mismatch("int", other.type_name())),
        }
    }
}

macro_rules! impl_from_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    let wide = i64::from_value(value)?;
                    <$ty>::try_from(wide)
                        .map_err(|_| Error::type_mismatch(stringify!($ty), "int"))
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(Error::type_mismatch("float", other.type_name())),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(Error::type_mismatch("text", other.type_name())),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => Err(Error::type_mismatch("datetime", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(Error::type_mismatch("list", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(map) => map
                .into_iter()
                .map(|(key, item)| T::from_value(item).map(|item| (key, item)))
                .collect(),
            other => Err(Error::type_mismatch("map", other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scalars() {
        assert!(bool::from_value(Value::Bool(true)).unwrap());
        assert_eq!(i64::from_value(Value::Int(-3)).unwrap(), -3);
        assert_eq!(u8::from_value(Value::Int(200)).unwrap(), 200);
        assert_eq!(f64::from_value(Value::Int(2)).unwrap(), 2.0);
        assert_eq!(String::from_value(Value::from("x")).unwrap(), "x");

        let dt = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(DateTime::<Utc>::from_value(Value::DateTime(dt)).unwrap(), dt);
    }

    #[test]
    fn test_narrowing_overflow() {
        assert!(matches!(
            u8::from_value(Value::Int(300)),
            Err(Error::TypeMismatch { expected: "u8", found: "int", .. })
        ));
        assert!(u32::from_value(Value::Int(-1)).is_err());
    }

    #[test]
    fn test_mismatch() {
        assert!(matches!(
            i64::from_value(Value::from("5")),
            Err(Error::TypeMismatch { expected: "int", found: "text", .. })
        ));
        assert!(String::from_value(Value::Int(5)).is_err());
    }

    #[test]
    fn test_containers() {
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i64>::from_value(Value::Int(1)).unwrap(), Some(1));
        assert_eq!(
            Vec::<String>::from_value(Value::from(vec!["a", "b"])).unwrap(),
            vec!["a", "b"]
        );
        assert!(Vec::<i64>::from_value(Value::from(vec!["a"])).is_err());

        let map = Value::Map(BTreeMap::from([("k".to_string(), Value::Int(1))]));
        assert_eq!(
            BTreeMap::<String, i64>::from_value(map).unwrap()["k"],
            1
        );
    }
}

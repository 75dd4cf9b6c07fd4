//! Typed structured fields
//!
//! Structured log calls take a slice of [`Field`]s. Each value is one of a
//! closed set of variants so encoders never have to guess at a type.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// A structured field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
}

impl Value {
    /// The string payload, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Duration(d) => write!(f, "{:?}", d),
        }
    }
}

/// Durations serialize as floating-point seconds.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Uint(v) => serializer.serialize_u64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Duration(d) => serializer.serialize_f64(d.as_secs_f64()),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint(u64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Uint(v as u64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

/// A key/value pair attached to a log record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: Value,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Shorthand for a string-valued field
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, Value::Str(value.into()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Merge field layers into one list, later layers winning on key collisions.
///
/// A replaced field keeps the position of its first occurrence.
pub fn merge_fields<'a, I>(layers: I) -> Vec<Field>
where
    I: IntoIterator<Item = &'a [Field]>,
{
    let mut merged: Vec<Field> = Vec::new();
    for layer in layers {
        for field in layer {
            match merged.iter_mut().find(|f| f.key == field.key) {
                Some(existing) => existing.value = field.value.clone(),
                None => merged.push(field.clone()),
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::from(-4i64).to_string(), "-4");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(Duration::from_millis(1500)).to_string(), "1.5s");
    }

    #[test]
    fn test_value_serialization() {
        assert_eq!(serde_json::to_string(&Value::from("x")).unwrap(), "\"x\"");
        assert_eq!(serde_json::to_string(&Value::from(7u32)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&Value::from(Duration::from_millis(250))).unwrap(),
            "0.25"
        );
    }

    #[test]
    fn test_as_str_only_for_strings() {
        assert_eq!(Value::from("a").as_str(), Some("a"));
        assert_eq!(Value::from(1i64).as_str(), None);
    }

    #[test]
    fn test_merge_fields_later_layer_wins() {
        let base = [Field::string("user_id", "u1"), Field::new("attempt", 1i64)];
        let call = [Field::new("attempt", 2i64), Field::new("ok", true)];

        let merged = merge_fields([&base[..], &call[..]]);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].key(), "user_id");
        assert_eq!(merged[1].value(), &Value::Int(2));
        assert_eq!(merged[2].key(), "ok");
    }
}

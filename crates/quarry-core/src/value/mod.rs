mod compare;


pub use compare::{canonical_cmp, semantic_cmp};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ValueError
///
/// Conversion failures when reading a `Value` back into a concrete field
/// type. Mismatches are reported, never coerced.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("integer value {0} is out of range for the target type")]
    OutOfRange(String),
}

///
/// Value
///
/// Runtime scalar union shared by rows, predicates, and sort keys.
/// Variants are intentionally few; anything richer lives behind the
/// entity's own field types and converts through `From`/`FieldValue`.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Float(f64),
    Int(i64),
    /// Ordered list of values. List order is preserved.
    List(Vec<Self>),
    Null,
    Text(String),
    Timestamp(DateTime<Utc>),
    Uint(u64),
}

impl Value {
    /// Canonical variant rank for cross-variant total ordering.
    ///
    /// Rank order is part of deterministic sort behavior and must remain
    /// fixed once published.
    #[must_use]
    pub(crate) const fn canonical_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Uint(_) => 3,
            Self::Float(_) => 4,
            Self::Text(_) => 5,
            Self::Timestamp(_) => 6,
            Self::List(_) => 7,
        }
    }

    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
            Self::Uint(_) => "uint",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view used by aggregation; non-numeric variants yield `None`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Uint(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Uint(_) | Self::Float(_))
    }

    /// Substring containment for text values; any other pairing is false.
    #[must_use]
    pub fn text_contains(&self, needle: &Self) -> bool {
        match (self, needle) {
            (Self::Text(hay), Self::Text(n)) => hay.contains(n.as_str()),
            _ => false,
        }
    }

    /// Prefix match for text values; any other pairing is false.
    #[must_use]
    pub fn text_starts_with(&self, prefix: &Self) -> bool {
        match (self, prefix) {
            (Self::Text(hay), Self::Text(p)) => hay.starts_with(p.as_str()),
            _ => false,
        }
    }

    /// Suffix match for text values; any other pairing is false.
    #[must_use]
    pub fn text_ends_with(&self, suffix: &Self) -> bool {
        match (self, suffix) {
            (Self::Text(hay), Self::Text(s)) => hay.ends_with(s.as_str()),
            _ => false,
        }
    }

    /// Render the value as a predicate literal: text quoted, numerics and
    /// booleans in native literal form.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Bool(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
            Self::Null => "NULL".to_string(),
            Self::Text(v) => format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")),
            Self::Timestamp(v) => {
                format!("\"{}\"", v.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(Self::render).collect();
                format!("{{{}}}", rendered.join(", "))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions in: native field types -> Value
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Conversions out: Value -> native field types
// ---------------------------------------------------------------------------

///
/// FieldValue
///
/// Two-way bridge between native field types and the runtime value
/// union. Entity field access goes through this trait; `from_value`
/// reports mismatches so callers can decide whether to drop or raise.
///

pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(ValueError::TypeMismatch {
                expected: "bool",
                found: other.variant_name(),
            }),
        }
    }
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(ValueError::TypeMismatch {
                expected: "float",
                found: other.variant_name(),
            }),
        }
    }
}

impl FieldValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(v) => Ok(v),
            Value::Uint(v) => Self::try_from(v).map_err(|_| ValueError::OutOfRange(v.to_string())),
            other => Err(ValueError::TypeMismatch {
                expected: "int",
                found: other.variant_name(),
            }),
        }
    }
}

impl FieldValue for u64 {
    fn to_value(&self) -> Value {
        Value::Uint(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Uint(v) => Ok(v),
            Value::Int(v) => Self::try_from(v).map_err(|_| ValueError::OutOfRange(v.to_string())),
            other => Err(ValueError::TypeMismatch {
                expected: "uint",
                found: other.variant_name(),
            }),
        }
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(ValueError::TypeMismatch {
                expected: "text",
                found: other.variant_name(),
            }),
        }
    }
}

impl FieldValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Timestamp(v) => Ok(v),
            other => Err(ValueError::TypeMismatch {
                expected: "timestamp",
                found: other.variant_name(),
            }),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueError::TypeMismatch {
                expected: "list",
                found: other.variant_name(),
            }),
        }
    }
}

//! Scalar values used in filter rules and projections.
//!
//! A [`FieldValue`] is the closed set of scalar kinds a rule may compare
//! against and a record may expose through [`crate::Record::get`]:
//! booleans, integers, floats, decimals, text, timestamps, durations,
//! UUIDs, enums, and null.
//!
//! # Examples
//!
//! ```rust
//! use entity_query::FieldValue;
//!
//! // Integer values
//! let val: FieldValue = 42.into();
//! assert!(matches!(val, FieldValue::Int(42)));
//!
//! // String values
//! let val: FieldValue = "hello".into();
//! assert!(matches!(val, FieldValue::Str(_)));
//!
//! // `None` converts to null, which drives the `*_if_not_null` builders.
//! let val: FieldValue = Option::<i64>::None.into();
//! assert!(val.is_null());
//! ```

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// An enum value carried by a rule or produced by a record.
///
/// Enums are compared by discriminant, but only between values of the same
/// declared enum type; the type name is what makes two discriminants
/// comparable. Integer constants coerce to the member's enum type during
/// predicate compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Name of the enum type this discriminant belongs to.
    pub type_name: SmolStr,
    /// The discriminant.
    pub value: i64,
}

impl EnumValue {
    /// Create a new enum value.
    pub fn new(type_name: impl Into<SmolStr>, value: i64) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }
}

/// Implemented by user enums so they can appear in rules and records.
///
/// # Examples
///
/// ```rust
/// use entity_query::{EnumField, FieldValue};
///
/// #[derive(Debug, Clone, Copy)]
/// enum Status {
///     Active,
///     Suspended,
/// }
///
/// impl EnumField for Status {
///     const TYPE_NAME: &'static str = "Status";
///
///     fn discriminant(self) -> i64 {
///         self as i64
///     }
/// }
///
/// let val = Status::Suspended.to_value();
/// assert!(matches!(val, FieldValue::Enum(_)));
/// ```
pub trait EnumField: Copy {
    /// Name of the enum type, shared by every value of the enum.
    const TYPE_NAME: &'static str;

    /// The discriminant of this value.
    fn discriminant(self) -> i64;

    /// Convert into a [`FieldValue`].
    fn to_value(self) -> FieldValue {
        FieldValue::Enum(EnumValue::new(Self::TYPE_NAME, self.discriminant()))
    }
}

/// A scalar value usable in a filter rule or a projected row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Arbitrary-precision decimal value.
    Decimal(Decimal),
    /// Text value.
    Str(String),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
    /// Signed duration.
    #[serde(with = "duration_serde")]
    Duration(Duration),
    /// UUID value.
    Uuid(Uuid),
    /// Enum discriminant tagged with its enum type name.
    Enum(EnumValue),
}

/// The kind of a [`FieldValue`], used in coercion checks and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Null.
    Null,
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Floating point.
    Float,
    /// Decimal.
    Decimal,
    /// Text.
    Text,
    /// UTC timestamp.
    DateTime,
    /// Signed duration.
    Duration,
    /// UUID.
    Uuid,
    /// Enum discriminant.
    Enum,
}

impl ValueKind {
    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::DateTime => "datetime",
            Self::Duration => "duration",
            Self::Uuid => "uuid",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FieldValue {
    /// Check if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Str(_) => ValueKind::Text,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Duration(_) => ValueKind::Duration,
            Self::Uuid(_) => ValueKind::Uuid,
            Self::Enum(_) => ValueKind::Enum,
        }
    }

    /// Compare two values of the same kind.
    ///
    /// Null sorts before everything; floats use a total order. Returns
    /// `None` when the kinds differ (or when two enums belong to different
    /// enum types), which callers treat as "not comparable".
    pub(crate) fn compare(&self, other: &Self) -> Option<Ordering> {
        use FieldValue::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Null, _) => Some(Ordering::Less),
            (_, Null) => Some(Ordering::Greater),
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (Float(a), Float(b)) => Some(a.total_cmp(b)),
            (Decimal(a), Decimal(b)) => Some(a.cmp(b)),
            (Str(a), Str(b)) => Some(a.cmp(b)),
            (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
            (Duration(a), Duration(b)) => Some(a.cmp(b)),
            (Uuid(a), Uuid(b)) => Some(a.cmp(b)),
            (Enum(a), Enum(b)) if a.type_name == b.type_name => Some(a.value.cmp(&b.value)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::DateTime(v) => write!(f, "{v}"),
            Self::Duration(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Enum(v) => write!(f, "{}::{}", v.type_name, v.value),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<Duration> for FieldValue {
    fn from(v: Duration) -> Self {
        Self::Duration(v)
    }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<EnumValue> for FieldValue {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}

impl<V: Into<FieldValue>> From<Option<V>> for FieldValue {
    fn from(v: Option<V>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// Serde representation for [`chrono::Duration`] as `(seconds, subsec_nanos)`.
mod duration_serde {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (value.num_seconds(), value.subsec_nanos()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let (seconds, nanos): (i64, i32) = Deserialize::deserialize(deserializer)?;
        Ok(Duration::seconds(seconds) + Duration::nanoseconds(nanos as i64))
    }
}

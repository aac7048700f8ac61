//! Dynamic value representation for KV3 data.
//!
//! [`Value`] is the closed set of things a KV3 document can hold. It keeps the
//! distinctions the text format makes and plain Rust data does not: a
//! multi-line string is not the same value as a single-line string with the
//! same contents, and a flagged value is not the same as its inner value.
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_kv3::{Flags, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! let notes = Value::multiline("line one\nline two");
//! let sound = Value::flagged(Value::from("ui.click"), Flags::SOUNDEVENT);
//!
//! assert!(notes.is_string());
//! assert_eq!(sound.flags(), Flags::SOUNDEVENT);
//! assert_eq!(sound.unflagged().as_str(), Some("ui.click"));
//! ```
//!
//! ## Extracting Values
//!
//! ```rust
//! use serde_kv3::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```

use crate::{Flags, Kv3Map};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// A dynamically-typed KV3 value.
///
/// Integers that fit in an `i64` are stored as [`Value::Int`];
/// [`Value::BigInt`] only holds integers outside that range. Conversions
/// through `From` narrow automatically, and the serializer rejects a
/// `BigInt` that would fit in an `i64`.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    BigInt(BigInt),
    Float(f64),
    String(String),
    MultilineString(String),
    Array(Vec<Value>),
    Object(Kv3Map),
    Flagged(FlaggedValue),
}

/// A value tagged with one or more [`Flags`].
///
/// A flagged value never wraps another flagged value, and its flag set is
/// never empty; the serializer rejects trees that break either rule.
#[derive(Clone, Debug, PartialEq)]
pub struct FlaggedValue {
    pub value: Box<Value>,
    pub flags: Flags,
}

impl FlaggedValue {
    #[must_use]
    pub fn new(value: Value, flags: Flags) -> Self {
        FlaggedValue {
            value: Box::new(value),
            flags,
        }
    }
}

impl Value {
    /// Creates a multi-line string value, written between `"""` delimiters.
    #[must_use]
    pub fn multiline<S: Into<String>>(text: S) -> Self {
        Value::MultilineString(text.into())
    }

    /// Wraps `value` with `flags`.
    #[must_use]
    pub fn flagged(value: Value, flags: Flags) -> Self {
        Value::Flagged(FlaggedValue::new(value, flags))
    }

    /// Creates a `resource` flagged string from a filesystem path.
    ///
    /// Resource paths are written lower-case with `/` separators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_kv3::{Flags, Value};
    ///
    /// let value = Value::resource("Materials\\Dev\\Grid.vmat");
    /// assert_eq!(value.flags(), Flags::RESOURCE);
    /// assert_eq!(value.unflagged().as_str(), Some("materials/dev/grid.vmat"));
    /// ```
    #[must_use]
    pub fn resource<P: AsRef<Path>>(path: P) -> Self {
        let text = path
            .as_ref()
            .to_string_lossy()
            .replace('\\', "/")
            .to_lowercase();
        Value::flagged(Value::String(text), Flags::RESOURCE)
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is an integer of any width.
    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_) | Value::BigInt(_))
    }

    /// Returns `true` if the value is a float.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns `true` if the value is a single-line or multi-line string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_) | Value::MultilineString(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if the value carries flags.
    #[inline]
    #[must_use]
    pub const fn is_flagged(&self) -> bool {
        matches!(self, Value::Flagged(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string of either kind, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_kv3::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::multiline("a\nb").as_str(), Some("a\nb"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::MultilineString(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer that fits in an `i64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::BigInt(bi) => i64::try_from(bi).ok(),
            _ => None,
        }
    }

    /// If the value is numeric, returns it as an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(bi) => Some(bi),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Kv3Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_flagged(&self) -> Option<&FlaggedValue> {
        match self {
            Value::Flagged(flagged) => Some(flagged),
            _ => None,
        }
    }

    /// Returns the flags on this value, or an empty set for unflagged values.
    #[must_use]
    pub fn flags(&self) -> Flags {
        match self {
            Value::Flagged(flagged) => flagged.flags,
            _ => Flags::empty(),
        }
    }

    /// Returns the value with any flags stripped.
    #[must_use]
    pub fn unflagged(&self) -> &Value {
        match self {
            Value::Flagged(flagged) => &flagged.value,
            other => other,
        }
    }

    /// Name of the variant, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::BigInt(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::MultilineString(_) => "multiline string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Flagged(_) => "flagged value",
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::BigInt(bi) => match i128::try_from(bi) {
                Ok(i) => serializer.serialize_i128(i),
                Err(_) => serializer.serialize_str(&bi.to_string()),
            },
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) | Value::MultilineString(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Flagged(flagged) => flagged.value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid KV3 value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(Value::from(BigInt::from(value)))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(Value::from(BigInt::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Kv3Map::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            Value::BigInt(bi) => i64::try_from(&bi)
                .map_err(|_| crate::Error::custom(format!("integer {} does not fit in i64", bi))),
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {}",
                value.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {}",
                value.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {}",
                value.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) | Value::MultilineString(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {}",
                value.kind()
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_small_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_small_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::BigInt(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for Value {
    /// Narrows to [`Value::Int`] when the integer fits in an `i64`.
    fn from(value: BigInt) -> Self {
        match i64::try_from(&value) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::BigInt(value),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Kv3Map> for Value {
    fn from(value: Kv3Map) -> Self {
        Value::Object(value)
    }
}

impl From<FlaggedValue> for Value {
    fn from(value: FlaggedValue) -> Self {
        Value::Flagged(value)
    }
}

impl FromIterator<(String, Value)> for Value {
    /// Collects key-value pairs into an object, keeping their order.
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Value::Object(Kv3Map::from_iter(iter))
    }
}

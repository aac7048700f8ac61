//! KV3 deserialization.
//!
//! [`Deserializer`] reads Rust types out of a parsed [`Value`] tree. Text is
//! parsed into a [`Document`](crate::Document) first and its root value is
//! then handed to `serde`, so all syntax and header errors surface before any
//! type mapping happens.
//!
//! Flags carry no meaning for typed reads: a flagged value deserializes as its
//! inner value, so `resource:"a.vmdl"` reads into a plain `String`.
//!
//! ## Usage
//!
//! ```rust
//! use serde_kv3::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Prop { model: String, scale: f64 }
//!
//! let text = "<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->\n\
//!             { model = resource:\"models/crate.vmdl\" scale = 1.5 }";
//! let prop: Prop = from_str(text).unwrap();
//! assert_eq!(prop, Prop { model: "models/crate.vmdl".into(), scale: 1.5 });
//! ```
//!
//! Enums are read the way [`ValueSerializer`](crate::ValueSerializer) writes
//! them: unit variants as strings, other variants as a single-key object.

use crate::{Error, Kv3Map, Result, Value};
use num_bigint::BigInt;
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

/// A `serde` deserializer over an owned [`Value`].
pub struct Deserializer {
    value: Value,
}

impl Deserializer {
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Deserializer { value }
    }
}

fn visit_bigint<'de, V>(bi: BigInt, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    if let Ok(u) = u64::try_from(&bi) {
        return visitor.visit_u64(u);
    }
    if let Ok(i) = i128::try_from(&bi) {
        return visitor.visit_i128(i);
    }
    if let Ok(u) = u128::try_from(&bi) {
        return visitor.visit_u128(u);
    }
    visitor.visit_string(bi.to_string())
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => visitor.visit_i64(i),
            Value::BigInt(bi) => visit_bigint(bi, visitor),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) | Value::MultilineString(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            Value::Flagged(flagged) => {
                Deserializer::from_value(*flagged.value).deserialize_any(visitor)
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.value.unflagged().is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let value = match self.value {
            Value::Flagged(flagged) => *flagged.value,
            other => other,
        };
        match value {
            Value::String(s) | Value::MultilineString(s) => {
                visitor.visit_enum(s.into_deserializer())
            }
            Value::Object(obj) => {
                let mut pairs = obj.into_iter();
                match (pairs.next(), pairs.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, value))
                    }
                    _ => Err(Error::custom(
                        "expected an object with a single key naming the enum variant",
                    )),
                }
            }
            other => Err(Error::custom(format!(
                "expected enum variant, found {}",
                other.kind()
            ))),
        }
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let wide = match self.value.unflagged() {
            Value::BigInt(bi) => Some(i128::try_from(bi).map_err(|_| {
                Error::custom(format!("integer {} out of range for i128", bi))
            })),
            _ => None,
        };
        match wide {
            Some(i) => visitor.visit_i128(i?),
            None => self.deserialize_any(visitor),
        }
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let wide = match self.value.unflagged() {
            Value::BigInt(bi) => Some(u128::try_from(bi).map_err(|_| {
                Error::custom(format!("integer {} out of range for u128", bi))
            })),
            _ => None,
        };
        match wide {
            Some(u) => visitor.visit_u128(u?),
            None => self.deserialize_any(visitor),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(Deserializer::from_value(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: Kv3Map) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(Deserializer::from_value(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value.unflagged() {
            Value::Null => Ok(()),
            other => Err(Error::custom(format!(
                "expected unit variant, found {}",
                other.kind()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(Deserializer::from_value(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(Deserializer::from_value(self.value), visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(Deserializer::from_value(self.value), visitor)
    }
}

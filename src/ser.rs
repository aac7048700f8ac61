//! KV3 serialization.
//!
//! This module has two halves:
//!
//! - [`Serializer`] writes a [`Document`] or [`Value`] tree as canonical KV3 text.
//! - [`ValueSerializer`] is a `serde` serializer that turns any `Serialize`
//!   type into a [`Value`] tree, which is how host records reach the writer.
//!
//! ## Layout
//!
//! Output is deterministic. Objects are always blocks, one `key = value` pair
//! per line, indented with one tab per level. Arrays are written inline
//! (`[1, 2, 3]`) unless an element is an object, in which case every element
//! gets its own line:
//!
//! ```rust
//! use serde_kv3::{kv3, Document};
//!
//! let doc = Document::new(kv3!({
//!     "tags": ["a", "b"],
//!     "items": [{ "id": 1 }]
//! }));
//! let text = doc.to_kv3_string().unwrap();
//! assert!(text.ends_with(
//!     "{\n\ttags = [\"a\", \"b\"]\n\titems = \n\t[\n\t\t{\n\t\t\tid = 1\n\t\t},\n\t]\n}"
//! ));
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_kv3::{Kv3Options, Serializer, Value};
//!
//! let mut serializer = Serializer::new(Kv3Options::new());
//! serializer.serialize_value(&Value::from(vec![Value::from(1), Value::from(2.5)])).unwrap();
//! assert_eq!(serializer.into_inner(), "[1, 2.5]");
//! ```

use crate::grammar::is_identifier;
use crate::{Document, Error, FlaggedValue, Kv3Map, Kv3Options, Result, Value};
use num_bigint::BigInt;
use serde::{ser, Serialize};
use tracing::debug;

/// The canonical KV3 text writer.
pub struct Serializer {
    output: String,
    options: Kv3Options,
}

impl Serializer {
    pub fn new(options: Kv3Options) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes the document's own header followed by its root value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTree`] if the tree has no valid text form.
    pub fn serialize_document(&mut self, document: &Document) -> Result<()> {
        self.output.push_str(&document.header.to_string());
        self.output.push('\n');
        self.write_value(&document.root, 0)
    }

    /// Writes a bare value at the top nesting level, without a header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTree`] if the tree has no valid text form.
    pub fn serialize_value(&mut self, value: &Value) -> Result<()> {
        self.write_value(value, 0)
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.output.push('\t');
        }
    }

    fn write_value(&mut self, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => self.output.push_str(&i.to_string()),
            Value::BigInt(bi) => {
                if i64::try_from(bi).is_ok() {
                    return Err(Error::invalid_tree(format!(
                        "big integer {} fits in an i64 and must be stored as Int",
                        bi
                    )));
                }
                self.output.push_str(&bi.to_string());
            }
            Value::Float(f) => {
                let text = format_float(*f, self.options.float_precision)?;
                self.output.push_str(&text);
            }
            Value::String(s) => {
                if s.contains('"') {
                    return Err(Error::invalid_tree(format!(
                        "string {:?} contains a double quote",
                        s
                    )));
                }
                self.output.push('"');
                self.output.push_str(s);
                self.output.push('"');
            }
            Value::MultilineString(s) => {
                if s.contains("\"\"\"") {
                    return Err(Error::invalid_tree(
                        "multi-line string contains a triple quote",
                    ));
                }
                self.output.push_str("\"\"\"");
                self.output.push_str(s);
                self.output.push_str("\"\"\"");
            }
            Value::Array(elements) => {
                if is_block_array(elements) {
                    self.write_block_array(elements, depth)?;
                } else {
                    self.write_inline_array(elements, depth)?;
                }
            }
            Value::Object(map) => self.write_object(map, depth)?,
            Value::Flagged(flagged) => self.write_flagged(flagged, depth)?,
        }
        Ok(())
    }

    fn write_flagged(&mut self, flagged: &FlaggedValue, depth: usize) -> Result<()> {
        if flagged.flags.is_empty() {
            return Err(Error::invalid_tree("flagged value has no flags"));
        }
        if flagged.value.is_flagged() {
            return Err(Error::invalid_tree("flagged value wraps another flagged value"));
        }
        self.output.push_str(&flagged.flags.to_string());
        self.output.push(':');
        self.write_value(&flagged.value, depth)
    }

    fn write_inline_array(&mut self, elements: &[Value], depth: usize) -> Result<()> {
        self.output.push('[');
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_value(element, depth)?;
        }
        self.output.push(']');
        Ok(())
    }

    fn write_block_array(&mut self, elements: &[Value], depth: usize) -> Result<()> {
        self.output.push_str("[\n");
        for element in elements {
            self.indent(depth + 1);
            self.write_value(element, depth + 1)?;
            self.output.push_str(",\n");
        }
        self.indent(depth);
        self.output.push(']');
        Ok(())
    }

    fn write_object(&mut self, map: &Kv3Map, depth: usize) -> Result<()> {
        self.output.push_str("{\n");
        for (key, value) in map {
            self.indent(depth + 1);
            self.write_key(key)?;
            self.output.push_str(" = ");
            if is_block(value) {
                self.output.push('\n');
                self.indent(depth + 1);
            }
            self.write_value(value, depth + 1)?;
            self.output.push('\n');
        }
        self.indent(depth);
        self.output.push('}');
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> Result<()> {
        if !self.options.quote_all_keys && is_identifier(key) {
            self.output.push_str(key);
            return Ok(());
        }
        if key.contains('"') {
            return Err(Error::invalid_tree(format!(
                "key {:?} contains a double quote",
                key
            )));
        }
        self.output.push('"');
        self.output.push_str(key);
        self.output.push('"');
        Ok(())
    }
}

/// Writes a document in canonical form with the given options.
pub(crate) fn document_to_string(document: &Document, options: Kv3Options) -> Result<String> {
    debug!(root = document.root.kind(), "serializing kv3 document");
    let mut serializer = Serializer::new(options);
    serializer.serialize_document(document)?;
    let output = serializer.into_inner();
    debug!(len = output.len(), "serialized kv3 document");
    Ok(output)
}

/// Values that are written over several lines, starting on a line of their own.
fn is_block(value: &Value) -> bool {
    match value.unflagged() {
        Value::Object(_) => true,
        Value::Array(elements) => is_block_array(elements),
        _ => false,
    }
}

fn is_block_array(elements: &[Value]) -> bool {
    elements.iter().any(is_block)
}

/// Rounds to `precision` places, then trims trailing zeros while keeping
/// at least one fractional digit so the text still reads back as a float.
fn format_float(value: f64, precision: usize) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::invalid_tree(format!(
            "float {} has no text form",
            value
        )));
    }
    let mut text = format!("{:.*}", precision, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    } else {
        text.push_str(".0");
    }
    Ok(text)
}

/// Serializes any `Serialize` type into a [`Value`] tree.
///
/// Structs and maps become objects in field order, sequences and tuples become
/// arrays, `None` and unit become null. Enum variants carrying data become a
/// single-key object named after the variant.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: Kv3Map,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::from(BigInt::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::from(BigInt::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut map = Kv3Map::with_capacity(1);
        map.insert(variant.to_string(), to_value(value)?);
        Ok(Value::Object(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

/// Wraps `value` as `{ variant = value }` when building an enum variant.
fn wrap_variant(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(name) => {
            let mut map = Kv3Map::with_capacity(1);
            map.insert(name.to_string(), value);
            Value::Object(map)
        }
        None => value,
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        wrap_variant(self.variant, Value::Array(self.vec))
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: Kv3Map::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Value {
        wrap_variant(self.variant, Value::Object(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::custom(format!(
                "map keys must be strings, found {}",
                other.kind()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Flags, Header};
    use pretty_assertions::assert_eq;

    fn render(value: &Value) -> Result<String> {
        let mut serializer = Serializer::new(Kv3Options::new());
        serializer.serialize_value(value)?;
        Ok(serializer.into_inner())
    }

    fn object(pairs: Vec<(&str, Value)>) -> Value {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(&Value::Null).unwrap(), "null");
        assert_eq!(render(&Value::Bool(false)).unwrap(), "false");
        assert_eq!(render(&Value::Int(-42)).unwrap(), "-42");
        assert_eq!(render(&Value::from("x y")).unwrap(), "\"x y\"");
        assert_eq!(
            render(&Value::multiline("a\nb")).unwrap(),
            "\"\"\"a\nb\"\"\""
        );
    }

    #[test]
    fn test_bigint_outside_i64() {
        let big = Value::from(u64::MAX);
        assert_eq!(render(&big).unwrap(), "18446744073709551615");
        let low = Value::from(BigInt::from(i64::MIN) - 1);
        assert_eq!(render(&low).unwrap(), "-9223372036854775809");
    }

    #[test]
    fn test_float_format() {
        assert_eq!(format_float(64.0, 6).unwrap(), "64.0");
        assert_eq!(format_float(0.1, 6).unwrap(), "0.1");
        assert_eq!(format_float(1.23456789, 6).unwrap(), "1.234568");
        assert_eq!(format_float(0.30000000000000004, 6).unwrap(), "0.3");
        assert_eq!(format_float(-2.5, 6).unwrap(), "-2.5");
        assert_eq!(format_float(7.0, 0).unwrap(), "7.0");
        assert!(format_float(f64::NAN, 6).is_err());
        assert!(format_float(f64::INFINITY, 6).is_err());
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(render(&Value::Array(vec![])).unwrap(), "[]");
        assert_eq!(render(&Value::Object(Kv3Map::new())).unwrap(), "{\n}");
    }

    #[test]
    fn test_nested_object_layout() {
        let value = object(vec![
            ("a", Value::from("asd asd")),
            ("b", object(vec![("inner_b", Value::from(3))])),
        ]);
        assert_eq!(
            render(&value).unwrap(),
            "{\n\ta = \"asd asd\"\n\tb = \n\t{\n\t\tinner_b = 3\n\t}\n}"
        );
    }

    #[test]
    fn test_block_array_layout() {
        let value = Value::Array(vec![object(vec![("x", Value::from(1))]), Value::from(2)]);
        assert_eq!(
            render(&value).unwrap(),
            "[\n\t{\n\t\tx = 1\n\t},\n\t2,\n]"
        );
    }

    #[test]
    fn test_flagged_object_makes_block_array() {
        let value = Value::Array(vec![Value::flagged(object(vec![]), Flags::SUBCLASS)]);
        assert_eq!(render(&value).unwrap(), "[\n\tsubclass:{\n\t},\n]");
    }

    #[test]
    fn test_nested_inline_arrays() {
        let value = Value::Array(vec![
            Value::Array(vec![Value::from(1), Value::from(2)]),
            Value::Array(vec![]),
        ]);
        assert_eq!(render(&value).unwrap(), "[[1, 2], []]");
    }

    #[test]
    fn test_flag_order() {
        let value = Value::flagged(
            Value::from("a.vmdl"),
            Flags::RESOURCE_NAME | Flags::RESOURCE,
        );
        assert_eq!(
            render(&value).unwrap(),
            "resource+resourcename:\"a.vmdl\""
        );
    }

    #[test]
    fn test_flagged_object_in_pair() {
        let value = object(vec![(
            "s",
            Value::flagged(object(vec![]), Flags::SUBCLASS),
        )]);
        assert_eq!(render(&value).unwrap(), "{\n\ts = \n\tsubclass:{\n\t}\n}");
    }

    #[test]
    fn test_key_quoting() {
        let value = object(vec![("plain_1", Value::Null), ("has space", Value::Null)]);
        assert_eq!(
            render(&value).unwrap(),
            "{\n\tplain_1 = null\n\t\"has space\" = null\n}"
        );

        let mut serializer = Serializer::new(Kv3Options::new().quote_all_keys());
        serializer.serialize_value(&value).unwrap();
        assert!(serializer.into_inner().contains("\"plain_1\" = null"));
    }

    #[test]
    fn test_invalid_trees() {
        let nested = Value::Flagged(FlaggedValue::new(
            Value::flagged(Value::Null, Flags::RESOURCE),
            Flags::PANORAMA,
        ));
        let empty_flags = Value::flagged(Value::Null, Flags::empty());
        let quoted = Value::from("say \"hi\"");
        let triple = Value::multiline("a\"\"\"b");
        let bad_key = object(vec![("a\"b", Value::Null)]);
        let small_bigint = Value::BigInt(BigInt::from(5));

        for tree in [nested, empty_flags, quoted, triple, bad_key, small_bigint] {
            assert!(
                matches!(render(&tree), Err(Error::InvalidTree(_))),
                "{:?} should be rejected",
                tree
            );
        }
    }

    #[test]
    fn test_document_header_line() {
        let doc = Document {
            header: Header::default(),
            root: Value::Object(Kv3Map::new()),
        };
        let text = document_to_string(&doc, Kv3Options::new()).unwrap();
        assert_eq!(text, format!("{}\n{{\n}}", Header::default()));
    }

    #[test]
    fn test_value_serializer_enums() {
        #[derive(Serialize)]
        enum Shape {
            Empty,
            Circle(f64),
            Rect { w: i32, h: i32 },
        }

        assert_eq!(to_value(&Shape::Empty).unwrap(), Value::from("Empty"));
        assert_eq!(
            to_value(&Shape::Circle(1.5)).unwrap(),
            object(vec![("Circle", Value::Float(1.5))])
        );
        assert_eq!(
            to_value(&Shape::Rect { w: 2, h: 3 }).unwrap(),
            object(vec![(
                "Rect",
                object(vec![("w", Value::from(2)), ("h", Value::from(3))])
            )])
        );
    }

    #[test]
    fn test_value_serializer_rejects_non_string_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(1, "one");
        assert!(to_value(&map).is_err());
    }
}

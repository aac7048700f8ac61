//! # serde_kv3
//!
//! Reading and writing the KV3 text format, with Serde support.
//!
//! ## What is KV3?
//!
//! KV3 is a typed, human-diffable key-value format used to describe
//! configuration and asset data. It looks like JSON with a header line in
//! front, and keeps typed distinctions that plain text does not carry:
//!
//! ```text
//! <!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->
//! {
//! 	name = "crate"
//! 	model = resource:"models/props/crate.vmdl"
//! 	size = [64, 64, 32]
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Lossless documents**: [`Document`] keeps the header, flags, multi-line
//!   strings and key order, so parsing canonical text and writing it again
//!   gives back the same bytes
//! - **Deterministic output**: a fixed canonical layout, tab-indented
//! - **Precise errors**: syntax errors report the line, the column and the
//!   grammar rule that was expected
//! - **Serde compatible**: host types go in and out through
//!   `#[derive(Serialize, Deserialize)]`
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_kv3 = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Documents
//!
//! ```rust
//! use serde_kv3::{parse, Flags, Value};
//!
//! let text = "<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->\n\
//! {\n\
//! \tmodel = resource:\"models/props/crate.vmdl\"\n\
//! \tsize = [64, 64, 32]\n\
//! }";
//!
//! let doc = parse(text).unwrap();
//! let root = doc.root.as_object().unwrap();
//! assert_eq!(root.get("model").unwrap().flags(), Flags::RESOURCE);
//!
//! assert_eq!(doc.to_kv3_string().unwrap(), text);
//! ```
//!
//! ### Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_kv3::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert!(text.ends_with("{\n\tid = 123\n\tname = \"Alice\"\n\tactive = true\n}"));
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! The Serde path goes through [`Value`] and its `Serialize` impl, which has no
//! way to express flags or multi-line strings. Use [`Document`] when those
//! must survive.
//!
//! ### Dynamic Values with kv3! Macro
//!
//! ```rust
//! use serde_kv3::{kv3, Document};
//!
//! let data = kv3!({
//!     "name": "crate",
//!     "model": (RESOURCE: "models/props/crate.vmdl"),
//!     "tags": ["wood", "physics"]
//! });
//!
//! let text = Document::new(data).to_kv3_string().unwrap();
//! assert!(text.contains("\tmodel = resource:\"models/props/crate.vmdl\"\n"));
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (parse and serialize at `debug`,
//! container construction at `trace`, duplicate keys at `warn`). It never
//! installs a subscriber.
//!
//! ## Format Reference
//!
//! See the [`format`] module for the grammar and the canonical layout.
//!
//! ## Examples
//!
//! The `demos/` directory has runnable examples:
//!
//! - **`simple.rs`** - Round-tripping a struct through KV3 text
//! - **`dynamic_values.rs`** - Building and inspecting documents with [`Value`]
//!
//! Run any example with: `cargo run --example <name>`

pub mod builder;
pub mod de;
pub mod document;
pub mod error;
pub mod flags;
pub mod format;
pub mod grammar;
pub mod header;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use de::Deserializer;
pub use document::Document;
pub use error::{Error, ErrorCategory, Position, Result};
pub use flags::Flags;
pub use grammar::Rule;
pub use header::Header;
pub use map::Kv3Map;
pub use options::Kv3Options;
pub use ser::{Serializer, ValueSerializer};
pub use value::{FlaggedValue, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parses KV3 text into a [`Document`].
///
/// # Examples
///
/// ```rust
/// use serde_kv3::{parse, Value};
///
/// let doc = parse("<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->\n[1, 2, 3]").unwrap();
/// assert_eq!(doc.root.as_array().map(Vec::len), Some(3));
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] with the position and expected rule when the text
/// does not match the grammar, and a semantic error when it matches but has no
/// meaning (no body, unknown flag, binary blob).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str) -> Result<Document> {
    Document::parse(text)
}

/// Writes a [`Document`] in canonical form.
///
/// # Errors
///
/// Returns [`Error::InvalidTree`] if the tree has no valid text form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_kv3_string(document: &Document) -> Result<String> {
    document.to_kv3_string()
}

/// Serialize any `T: Serialize` to a KV3 document string with the default header.
///
/// # Examples
///
/// ```rust
/// use serde_kv3::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string(&Point { x: 1, y: 2 }).unwrap();
/// assert!(text.ends_with("\n{\n\tx = 1\n\ty = 2\n}"));
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented, for example a
/// string containing `"` or a map with non-string keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Kv3Options::default())
}

/// Serialize any `T: Serialize` to a KV3 document string with custom options.
///
/// The header written is `options.header`.
///
/// # Errors
///
/// Returns an error if the value cannot be represented.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: Kv3Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let document = Document::with_header(options.header.clone(), to_value(value)?);
    document.to_kv3_string_with_options(options)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_kv3::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Interpret a [`Value`] as an instance of type `T`.
///
/// Flagged values read as their inner value.
///
/// # Errors
///
/// Returns an error if the value does not have the shape `T` expects.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(Deserializer::from_value(value))
}

/// Serialize any `T: Serialize` to a writer as a KV3 document.
///
/// # Examples
///
/// ```rust
/// use serde_kv3::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![1, 2, 3]).unwrap();
/// assert!(buffer.ends_with(b"\n[1, 2, 3]"));
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, Kv3Options::default())
}

/// Serialize any `T: Serialize` to a writer as a KV3 document with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: Kv3Options) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from KV3 document text.
///
/// # Examples
///
/// ```rust
/// use serde_kv3::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let text = "<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->\n{ x = 1 y = 2 }";
/// let point: Point = from_str(text).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text is not a valid KV3 document or cannot be
/// deserialized to type `T`. Syntax errors include line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse(s)?.root)
}

/// Deserialize an instance of type `T` from an I/O stream of KV3 text.
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not valid
/// KV3, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of KV3 text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid KV3, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

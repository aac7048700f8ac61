//! KV3 documents.
//!
//! A [`Document`] is a header plus exactly one root value. The header is
//! metadata about the body and takes no part in the root value itself.
//!
//! ## Examples
//!
//! ```rust
//! use serde_kv3::{Document, Value};
//!
//! let text = "<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->\n{\n\tname = \"crate\"\n}";
//!
//! let doc = Document::parse(text).unwrap();
//! assert_eq!(doc.header.format_name(), "generic");
//! assert_eq!(
//!     doc.root.as_object().and_then(|o| o.get("name")),
//!     Some(&Value::from("crate"))
//! );
//! assert_eq!(doc.to_kv3_string().unwrap(), text);
//! ```

use crate::{builder, grammar, ser, Header, Kv3Map, Kv3Options, Result, Value};
use std::str::FromStr;
use tracing::debug;

/// A header and its root value.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub header: Header,
    pub root: Value,
}

impl Default for Document {
    /// The default header with an empty object as root.
    fn default() -> Self {
        Document::new(Value::Object(Kv3Map::new()))
    }
}

impl Document {
    /// Wraps `root` in a document with the default header.
    #[must_use]
    pub fn new(root: Value) -> Self {
        Document {
            header: Header::default(),
            root,
        }
    }

    #[must_use]
    pub fn with_header(header: Header, root: Value) -> Self {
        Document { header, root }
    }

    /// Parses KV3 text into a document.
    ///
    /// # Errors
    ///
    /// - [`Error::Syntax`](crate::Error::Syntax) when the text does not match the grammar
    /// - [`Error::EmptyDocument`](crate::Error::EmptyDocument) when the header has no value after it
    /// - [`Error::UnknownFlag`](crate::Error::UnknownFlag) for flag names that are not flags
    /// - [`Error::NotImplemented`](crate::Error::NotImplemented) for binary blobs
    pub fn parse(text: &str) -> Result<Self> {
        let tree = grammar::parse_tree(text)?;
        let document = builder::build(&tree)?;
        debug!(root = document.root.kind(), "built kv3 document");
        Ok(document)
    }

    /// Writes the document in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTree`](crate::Error::InvalidTree) if the root
    /// contains a value with no text form.
    pub fn to_kv3_string(&self) -> Result<String> {
        ser::document_to_string(self, Kv3Options::new())
    }

    /// Writes the document with the given layout options.
    ///
    /// The document keeps its own header; only the formatting options apply.
    pub fn to_kv3_string_with_options(&self, options: Kv3Options) -> Result<String> {
        ser::document_to_string(self, options)
    }
}

impl FromStr for Document {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Document::parse(s)
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Document::new(root)
    }
}

//! Tree builder.
//!
//! Reduces a [`ParseTree`] into a [`Document`]. The grammar has already
//! checked the shape of every token, so the builder only assigns meaning:
//! scalars get their types, strings lose their delimiters, objects and arrays
//! are collected in source order, and flag names are resolved.

use crate::grammar::{parse_header_tree, ParseTree, Rule, SyntaxNode};
use crate::header::parse_guid;
use crate::{Document, Error, FlaggedValue, Flags, Header, Kv3Map, Result, Value};
use num_bigint::BigInt;
use tracing::{trace, warn};

/// Builds a document from a successful parse.
///
/// # Errors
///
/// - [`Error::EmptyDocument`] if the header is not followed by a value
/// - [`Error::UnknownFlag`] for a flag name that is not a known flag
/// - [`Error::NotImplemented`] for binary blobs
pub fn build(tree: &ParseTree<'_>) -> Result<Document> {
    let builder = Builder { tree };
    let document = tree.root();
    let header = match document.child(Rule::Header) {
        Some(node) => builder.header(node)?,
        None => return Err(Error::syntax(tree.position(0), Rule::Header)),
    };
    let body = document
        .children
        .iter()
        .find(|node| node.rule != Rule::Header)
        .ok_or(Error::EmptyDocument)?;
    let root = builder.value(body)?;
    Ok(Document { header, root })
}

/// Parses and builds a lone header line.
pub(crate) fn build_header(text: &str) -> Result<Header> {
    let tree = parse_header_tree(text)?;
    Builder { tree: &tree }.header(tree.root())
}

struct Builder<'t, 'a> {
    tree: &'t ParseTree<'a>,
}

impl<'t, 'a> Builder<'t, 'a> {
    fn text(&self, node: &SyntaxNode) -> &'a str {
        node.text(self.tree.source())
    }

    fn child<'n>(&self, node: &'n SyntaxNode, index: usize) -> Result<&'n SyntaxNode> {
        node.children
            .get(index)
            .ok_or_else(|| Error::syntax(self.tree.position(node.span.end), node.rule))
    }

    fn header(&self, node: &SyntaxNode) -> Result<Header> {
        let (encoding_name, encoding_version) = self.versioned(node, Rule::Encoding)?;
        let (format_name, format_version) = self.versioned(node, Rule::Format)?;
        Header::new(encoding_name, encoding_version, format_name, format_version)
    }

    fn versioned(&self, header: &SyntaxNode, rule: Rule) -> Result<(&'a str, uuid::Uuid)> {
        let node = header
            .child(rule)
            .ok_or_else(|| Error::syntax(self.tree.position(header.span.start), rule))?;
        let name = self.text(self.child(node, 0)?);
        let version = parse_guid(self.text(self.child(node, 1)?))?;
        Ok((name, version))
    }

    fn value(&self, node: &SyntaxNode) -> Result<Value> {
        let text = self.text(node);
        match node.rule {
            Rule::Null => Ok(Value::Null),
            Rule::True => Ok(Value::Bool(true)),
            Rule::False => Ok(Value::Bool(false)),
            Rule::Int => self.int(node, text),
            Rule::Float => match text.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                _ => Err(Error::syntax(self.tree.position(node.span.start), Rule::Float)),
            },
            Rule::String => Ok(Value::String(text[1..text.len() - 1].to_string())),
            Rule::MultilineString => Ok(Value::MultilineString(
                text[3..text.len() - 3].to_string(),
            )),
            Rule::Object => self.object(node),
            Rule::Array => {
                trace!(elements = node.children.len(), "building array");
                node.children
                    .iter()
                    .map(|element| self.value(element))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            Rule::FlaggedValue => self.flagged(node),
            Rule::Blob => Err(Error::not_implemented(
                "binary blob",
                self.tree.position(node.span.start),
            )),
            _ => Err(Error::syntax(
                self.tree.position(node.span.start),
                Rule::Value,
            )),
        }
    }

    fn int(&self, node: &SyntaxNode, text: &str) -> Result<Value> {
        let text = text.strip_prefix('+').unwrap_or(text);
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Int(i));
        }
        text.parse::<BigInt>()
            .map(Value::BigInt)
            .map_err(|_| Error::syntax(self.tree.position(node.span.start), Rule::Int))
    }

    fn object(&self, node: &SyntaxNode) -> Result<Value> {
        trace!(pairs = node.children.len(), "building object");
        let mut map = Kv3Map::with_capacity(node.children.len());
        for pair in &node.children {
            let key_node = self.child(self.child(pair, 0)?, 0)?;
            let key = match key_node.rule {
                Rule::String => {
                    let text = self.text(key_node);
                    &text[1..text.len() - 1]
                }
                _ => self.text(key_node),
            };
            let value = self.value(self.child(pair, 1)?)?;
            if map.insert(key.to_string(), value).is_some() {
                let position = self.tree.position(pair.span.start);
                warn!(key, %position, "duplicate key, keeping the last value");
            }
        }
        Ok(Value::Object(map))
    }

    fn flagged(&self, node: &SyntaxNode) -> Result<Value> {
        let names = self.child(node, 0)?;
        let mut flags = Flags::empty();
        for name in &names.children {
            let keyword = self.text(name);
            flags |= Flags::from_keyword(keyword).ok_or_else(|| {
                Error::unknown_flag(keyword, self.tree.position(name.span.start))
            })?;
        }
        let value = self.value(self.child(node, 1)?)?;
        Ok(Value::Flagged(FlaggedValue::new(value, flags)))
    }
}

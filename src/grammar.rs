//! KV3 grammar.
//!
//! This module turns raw text into a [`ParseTree`]: a concrete syntax tree of
//! [`SyntaxNode`]s, each tagged with the [`Rule`] that matched it. Whitespace
//! and comments are consumed but never stored.
//!
//! ```text
//! document   := header ws* body? ws*
//! header     := "<!--" sp "kv3" sp encoding sp format sp "-->" newline?
//! encoding   := "encoding:" ident ":version" guid
//! format     := "format:" ident ":version" guid
//! guid       := "{" 8hex "-" 4hex "-" 4hex "-" 4hex "-" 12hex "}"
//! body       := flagged_value | value
//! flagged_value := flags ":" value
//! flags      := ident (("+" | "|") ident)*
//! value      := "null" | "true" | "false" | float | int
//!             | multiline_string | string | object | array | blob
//! object     := "{" (ws* pair)* ws* "}"
//! pair       := (ident | string) ws* "=" ws* body
//! array      := "[" ws* (body ws* "," ws*)* (body ws*)? "]"
//! int        := sign? digit+              ; no fraction, no exponent
//! float      := sign? mantissa exponent?   ; fraction or exponent required
//! mantissa   := digit+ "." digit* | "." digit+ | digit+
//! exponent   := ("e" | "E") sign? digit+
//! sign       := "+" | "-"
//! string     := '"' non-quote* '"'
//! multiline_string := '"""' ... '"""'    ; closing run of quotes is matched greedily
//! blob       := "#[" (ws* hex hex)* ws* "]"
//! ws         := whitespace | "//" to end of line | "/*" ... "*/"
//! ident      := [A-Za-z0-9_]+
//! sp         := [ \t]+
//! ```
//!
//! The grammar is ordered-choice: a flagged value is tried before a plain
//! value, a float before an int, and a multi-line string before a string.
//! The first mismatch aborts with [`Error::Syntax`]; there is no recovery.
//!
//! ## Examples
//!
//! ```rust
//! use serde_kv3::grammar::{parse_tree, Rule};
//!
//! let text = "<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} \
//!             format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->\n\
//!             { a = 1 }";
//! let tree = parse_tree(text).unwrap();
//! let body = tree.root().children.last().unwrap();
//! assert_eq!(body.rule, Rule::Object);
//! assert_eq!(body.children[0].rule, Rule::Pair);
//! ```

use crate::{Error, Position, Result};
use std::fmt;
use tracing::{debug, trace};

/// Grammar rules, used to tag syntax nodes and to say what a parse expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Document,
    Header,
    Encoding,
    Format,
    Guid,
    Identifier,
    FlaggedValue,
    Flags,
    Value,
    Null,
    True,
    False,
    Int,
    Float,
    String,
    MultilineString,
    Object,
    Pair,
    Key,
    Array,
    Blob,
    /// A fixed token such as `=` or `]`.
    Literal(&'static str),
    EndOfInput,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Document => "document",
            Rule::Header => "header",
            Rule::Encoding => "encoding",
            Rule::Format => "format",
            Rule::Guid => "guid",
            Rule::Identifier => "identifier",
            Rule::FlaggedValue => "flagged_value",
            Rule::Flags => "flags",
            Rule::Value => "value",
            Rule::Null => "null",
            Rule::True => "true",
            Rule::False => "false",
            Rule::Int => "int",
            Rule::Float => "float",
            Rule::String => "string",
            Rule::MultilineString => "multiline_string",
            Rule::Object => "object",
            Rule::Pair => "pair",
            Rule::Key => "key",
            Rule::Array => "array",
            Rule::Blob => "blob",
            Rule::Literal(token) => return write!(f, "`{}`", token),
            Rule::EndOfInput => "end of input",
        };
        f.write_str(name)
    }
}

/// Byte range of a node in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A matched rule and the nodes it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub rule: Rule,
    pub span: Span,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    fn leaf(rule: Rule, start: usize, end: usize) -> Self {
        SyntaxNode {
            rule,
            span: Span { start, end },
            children: Vec::new(),
        }
    }

    fn branch(rule: Rule, start: usize, end: usize, children: Vec<SyntaxNode>) -> Self {
        SyntaxNode {
            rule,
            span: Span { start, end },
            children,
        }
    }

    /// The source text this node matched.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }

    /// The first direct child matching `rule`.
    #[must_use]
    pub fn child(&self, rule: Rule) -> Option<&SyntaxNode> {
        self.children.iter().find(|node| node.rule == rule)
    }
}

/// A successful parse: the source and the tree that matched it.
#[derive(Debug, Clone)]
pub struct ParseTree<'a> {
    source: &'a str,
    root: SyntaxNode,
}

impl<'a> ParseTree<'a> {
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[must_use]
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Resolves a byte offset in the source into a [`Position`].
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        Position::from_offset(self.source, offset)
    }
}

/// Parses a whole document into a syntax tree.
///
/// The root is a [`Rule::Document`] node whose first child is the header and
/// whose optional second child is the body.
///
/// # Errors
///
/// Returns [`Error::Syntax`] at the first position the text stops matching.
pub fn parse_tree(source: &str) -> Result<ParseTree<'_>> {
    debug!(len = source.len(), "parsing kv3 text");
    let mut parser = Parser::new(source);
    let root = parser.document()?;
    debug!(nodes = root.children.len(), "parsed kv3 syntax tree");
    Ok(ParseTree { source, root })
}

/// Parses a lone header line, with optional trailing whitespace.
pub(crate) fn parse_header_tree(source: &str) -> Result<ParseTree<'_>> {
    let mut parser = Parser::new(source);
    let root = parser.header()?;
    parser.skip_ws()?;
    if !parser.at_end() {
        return Err(parser.error(Rule::EndOfInput));
    }
    Ok(ParseTree { source, root })
}

/// Returns `true` if `text` is a non-empty run of `[A-Za-z0-9_]`.
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(is_identifier_byte)
}

#[inline]
fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn error(&self, expected: Rule) -> Error {
        self.error_at(self.position, expected)
    }

    fn error_at(&self, offset: usize, expected: Rule) -> Error {
        Error::syntax(Position::from_offset(self.input, offset), expected)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.position += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &'static str, expected: Rule) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    /// Skips whitespace and both comment forms.
    fn skip_ws(&mut self) -> Result<()> {
        loop {
            let rest = self.rest();
            if let Some(ch) = rest.chars().next().filter(|ch| ch.is_whitespace()) {
                self.position += ch.len_utf8();
            } else if rest.starts_with("//") {
                self.position += rest.find('\n').map_or(rest.len(), |i| i + 1);
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(i) => self.position += i + 4,
                    None => return Err(self.error_at(self.input.len(), Rule::Literal("*/"))),
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Skips spaces and tabs inside the header line; at least one is required.
    fn header_space(&mut self) -> Result<()> {
        let start = self.position;
        while matches!(self.peek_byte(), Some(b' ' | b'\t')) {
            self.position += 1;
        }
        if self.position == start {
            Err(self.error(Rule::Literal(" ")))
        } else {
            Ok(())
        }
    }

    fn document(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        let mut children = vec![self.header()?];
        self.skip_ws()?;
        if !self.at_end() {
            children.push(self.body()?);
            self.skip_ws()?;
            if !self.at_end() {
                return Err(self.error(Rule::EndOfInput));
            }
        }
        Ok(SyntaxNode::branch(
            Rule::Document,
            start,
            self.position,
            children,
        ))
    }

    fn header(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        self.expect("<!--", Rule::Header)?;
        self.header_space()?;
        self.expect("kv3", Rule::Literal("kv3"))?;
        self.header_space()?;
        let encoding = self.versioned("encoding:", Rule::Encoding)?;
        self.header_space()?;
        let format = self.versioned("format:", Rule::Format)?;
        self.header_space()?;
        self.expect("-->", Rule::Literal("-->"))?;
        let end = self.position;
        if !self.eat("\r\n") {
            self.eat("\n");
        }
        Ok(SyntaxNode::branch(
            Rule::Header,
            start,
            end,
            vec![encoding, format],
        ))
    }

    /// `encoding:` / `format:` followed by `ident ":version" guid`.
    fn versioned(&mut self, prefix: &'static str, rule: Rule) -> Result<SyntaxNode> {
        let start = self.position;
        self.expect(prefix, rule)?;
        let name = self.identifier()?;
        self.expect(":version", Rule::Literal(":version"))?;
        let guid = self.guid()?;
        Ok(SyntaxNode::branch(rule, start, self.position, vec![name, guid]))
    }

    fn guid(&mut self) -> Result<SyntaxNode> {
        const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
        let start = self.position;
        let bytes = self.input.as_bytes();
        let mut pos = start;

        if bytes.get(pos) != Some(&b'{') {
            return Err(self.error_at(start, Rule::Guid));
        }
        pos += 1;
        for (i, len) in GROUPS.iter().enumerate() {
            if i > 0 {
                if bytes.get(pos) != Some(&b'-') {
                    return Err(self.error_at(start, Rule::Guid));
                }
                pos += 1;
            }
            let group = bytes.get(pos..pos + len);
            if !group.is_some_and(|g| g.iter().all(u8::is_ascii_hexdigit)) {
                return Err(self.error_at(start, Rule::Guid));
            }
            pos += len;
        }
        if bytes.get(pos) != Some(&b'}') {
            return Err(self.error_at(start, Rule::Guid));
        }
        self.position = pos + 1;
        Ok(SyntaxNode::leaf(Rule::Guid, start, self.position))
    }

    fn identifier(&mut self) -> Result<SyntaxNode> {
        self.try_identifier()
            .ok_or_else(|| self.error(Rule::Identifier))
    }

    fn try_identifier(&mut self) -> Option<SyntaxNode> {
        let start = self.position;
        let len = self
            .rest()
            .bytes()
            .take_while(|b| is_identifier_byte(*b))
            .count();
        if len == 0 {
            return None;
        }
        self.position += len;
        Some(SyntaxNode::leaf(Rule::Identifier, start, self.position))
    }

    fn body(&mut self) -> Result<SyntaxNode> {
        match self.flagged_value()? {
            Some(node) => Ok(node),
            None => self.value(),
        }
    }

    /// Tries `flags ":" value`. Backtracks and returns `None` when the input
    /// does not start with a flag list followed by a colon.
    fn flagged_value(&mut self) -> Result<Option<SyntaxNode>> {
        let start = self.position;
        let mut names = Vec::new();
        match self.try_identifier() {
            Some(name) => names.push(name),
            None => return Ok(None),
        }
        while matches!(self.peek_byte(), Some(b'+' | b'|')) {
            self.position += 1;
            match self.try_identifier() {
                Some(name) => names.push(name),
                None => {
                    self.position = start;
                    return Ok(None);
                }
            }
        }
        let flags_end = self.position;
        if !self.eat(":") {
            self.position = start;
            return Ok(None);
        }
        let flags = SyntaxNode::branch(Rule::Flags, start, flags_end, names);
        let value = self.value()?;
        Ok(Some(SyntaxNode::branch(
            Rule::FlaggedValue,
            start,
            self.position,
            vec![flags, value],
        )))
    }

    fn value(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        let rest = self.rest();
        match self.peek_byte() {
            Some(b'n') if rest.starts_with("null") => Ok(self.keyword(Rule::Null, 4)),
            Some(b't') if rest.starts_with("true") => Ok(self.keyword(Rule::True, 4)),
            Some(b'f') if rest.starts_with("false") => Ok(self.keyword(Rule::False, 5)),
            Some(b'-' | b'+' | b'.' | b'0'..=b'9') => self.number(),
            Some(b'"') if rest.starts_with("\"\"\"") => self.multiline_string(),
            Some(b'"') => self.string(),
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b'#') if rest.starts_with("#[") => self.blob(),
            _ => Err(self.error_at(start, Rule::Value)),
        }
    }

    fn keyword(&mut self, rule: Rule, len: usize) -> SyntaxNode {
        let start = self.position;
        self.position += len;
        SyntaxNode::leaf(rule, start, self.position)
    }

    fn digits(&mut self) -> usize {
        let len = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        self.position += len;
        len
    }

    /// Accepts an optional sign, then `digits`, `digits.`, `.digits` or
    /// `digits.digits`, then an optional exponent. A fraction or an exponent
    /// makes the literal a float.
    fn number(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        if !self.eat("-") {
            self.eat("+");
        }
        let whole = self.digits();
        let mut rule = Rule::Int;
        if self.eat(".") {
            if self.digits() == 0 && whole == 0 {
                return Err(self.error_at(start, Rule::Float));
            }
            rule = Rule::Float;
        } else if whole == 0 {
            return Err(self.error_at(start, Rule::Int));
        }
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            self.position += 1;
            if !self.eat("-") {
                self.eat("+");
            }
            if self.digits() == 0 {
                return Err(self.error(Rule::Float));
            }
            rule = Rule::Float;
        }
        Ok(SyntaxNode::leaf(rule, start, self.position))
    }

    fn string(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        self.position += 1;
        match self.rest().find('"') {
            Some(i) => {
                self.position += i + 1;
                Ok(SyntaxNode::leaf(Rule::String, start, self.position))
            }
            None => Err(self.error_at(start, Rule::String)),
        }
    }

    fn multiline_string(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        self.position += 3;
        let rest = self.rest();
        let Some(open) = rest.find("\"\"\"") else {
            return Err(self.error_at(start, Rule::MultilineString));
        };
        // The closing delimiter is the last three quotes of the run.
        let run = rest[open..].bytes().take_while(|b| *b == b'"').count();
        self.position += open + run;
        Ok(SyntaxNode::leaf(Rule::MultilineString, start, self.position))
    }

    fn object(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        trace!(offset = start, "object");
        self.position += 1;
        let mut pairs = Vec::new();
        loop {
            self.skip_ws()?;
            if self.eat("}") {
                break;
            }
            pairs.push(self.pair()?);
        }
        Ok(SyntaxNode::branch(Rule::Object, start, self.position, pairs))
    }

    fn pair(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        let key_name = match self.peek_byte() {
            Some(b'"') => self.string()?,
            _ => self
                .try_identifier()
                .ok_or_else(|| self.error(Rule::Pair))?,
        };
        let key = SyntaxNode::branch(
            Rule::Key,
            key_name.span.start,
            key_name.span.end,
            vec![key_name],
        );
        self.skip_ws()?;
        self.expect("=", Rule::Literal("="))?;
        self.skip_ws()?;
        let value = self.body()?;
        Ok(SyntaxNode::branch(
            Rule::Pair,
            start,
            self.position,
            vec![key, value],
        ))
    }

    fn array(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        trace!(offset = start, "array");
        self.position += 1;
        let mut elements = Vec::new();
        loop {
            self.skip_ws()?;
            if self.eat("]") {
                break;
            }
            elements.push(self.body()?);
            self.skip_ws()?;
            if self.eat(",") {
                continue;
            }
            if self.eat("]") {
                break;
            }
            return Err(self.error(Rule::Literal("]")));
        }
        Ok(SyntaxNode::branch(
            Rule::Array,
            start,
            self.position,
            elements,
        ))
    }

    fn blob(&mut self) -> Result<SyntaxNode> {
        let start = self.position;
        self.position += 2;
        loop {
            self.skip_ws()?;
            if self.eat("]") {
                break;
            }
            let pair = self.rest().as_bytes().get(..2);
            if !pair.is_some_and(|p| p.iter().all(u8::is_ascii_hexdigit)) {
                return Err(self.error(Rule::Blob));
            }
            self.position += 2;
        }
        Ok(SyntaxNode::leaf(Rule::Blob, start, self.position))
    }
}

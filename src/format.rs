//! KV3 Text Format
//!
//! This module documents the KV3 text encoding as read and written by this
//! library.
//!
//! # Overview
//!
//! KV3 is a typed key-value format in the spirit of JSON. Every document opens
//! with a header naming its encoding and format, followed by exactly one value.
//! The text form keeps distinctions that JSON loses: multi-line strings are
//! their own type, and any value can carry semantic flags.
//!
//! # Header
//!
//! ```text
//! <!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->
//! ```
//!
//! - Names are identifiers: `[A-Za-z0-9_]+`
//! - Versions are GUIDs in braces, 8-4-4-4-12 hex digits, any case on input
//! - On input the tokens may be separated by runs of spaces or tabs, and the
//!   line may end in `\r\n`, `\n` or nothing at all (`-->null` is accepted);
//!   output always uses single spaces and `\n`
//!
//! # Values
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | Null | `null` | `parent = null` |
//! | Boolean | `true` or `false` | `enabled = true` |
//! | Integer | Decimal digits, optional sign | `count = -3` |
//! | Float | Digits with a fraction or an exponent | `scale = 0.5` |
//! | String | `"..."`, no escapes | `name = "crate"` |
//! | Multi-line string | `"""..."""` | `notes = """first\nsecond"""` |
//! | Object | `{ key = value ... }` | `origin = { x = 0 y = 0 }` |
//! | Array | `[a, b, c]`, trailing comma allowed | `size = [64, 64, 32]` |
//! | Flagged | `flag+flag:value` | `model = resource:"models/crate.vmdl"` |
//! | Binary blob | `#[ 00 ff ... ]` | recognized, not yet readable |
//!
//! A number with a decimal point or an exponent is a float, any other number
//! is an integer. On input a leading `+`, a bare `1.` or `.5`, and exponents
//! (`1.5e3`, `1E-4`) are accepted; output is always `digits.digits`. A float
//! too large for an `f64` is a syntax error. Integers outside the 64-bit range
//! are read as arbitrary-precision integers.
//!
//! ## Strings
//!
//! String bodies are taken literally. There is no escape processing, so a
//! backslash is just a backslash and a single-line string cannot contain `"`.
//! A multi-line string ends at the first run of three or more quotes; the last
//! three quotes of that run close the string, so the body may end in `"` but
//! cannot contain `"""`.
//!
//! ## Objects
//!
//! Pairs are separated by whitespace only. Keys are identifiers or strings:
//!
//! ```text
//! {
//!     name = "crate"
//!     "display name" = "Wooden Crate"
//! }
//! ```
//!
//! Pair order is kept. When a key repeats, the last value wins and the key
//! keeps its first position.
//!
//! ## Flags
//!
//! | Flag | Keyword |
//! |------|---------|
//! | [`Flags::RESOURCE`](crate::Flags::RESOURCE) | `resource` |
//! | [`Flags::RESOURCE_NAME`](crate::Flags::RESOURCE_NAME) | `resourcename` |
//! | [`Flags::PANORAMA`](crate::Flags::PANORAMA) | `panorama` |
//! | [`Flags::SOUNDEVENT`](crate::Flags::SOUNDEVENT) | `soundevent` |
//! | [`Flags::SUBCLASS`](crate::Flags::SUBCLASS) | `subclass` |
//!
//! Keywords are matched without regard to case and may be joined with `+` or
//! `|`. A flag list applies to exactly one value and flags do not nest.
//!
//! ## Comments
//!
//! `// line` and `/* block */` comments may appear wherever whitespace may.
//! They are discarded on read and never written.
//!
//! # Canonical Layout
//!
//! The serializer output for a given tree is fixed:
//!
//! ```text
//! <!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->
//! {
//! 	a = "asd asd"
//! 	b = 
//! 	{
//! 		inner_b = 3
//! 	}
//! 	c = ["listed_text1", "listed_text2"]
//! 	d = 
//! 	[
//! 		{
//! 			id = 1
//! 		},
//! 	]
//! }
//! ```
//!
//! - One tab per nesting level
//! - Objects are always blocks, even when empty (`{` newline `}`)
//! - A pair whose value is a block puts the block on the next line
//! - Arrays are inline unless an element is an object or a block array. A
//!   flagged object counts as an object, so `[subclass:{ ... }]` is a block,
//!   and so is an array holding a block array at any depth
//! - Floats are rounded to six decimal places, trailing zeros dropped
//!   (`64.0`, `0.1`, `1.234568`)
//! - Flags are written in the order of the table above, joined with `+`
//! - Keys are bare when they are identifiers and quoted otherwise
//! - No trailing newline after the root value
//!
//! Parsing canonical text and writing it again gives back the same text.
//!
//! # Limitations
//!
//! - Binary blobs parse but cannot be turned into values
//! - Strings containing `"` and multi-line strings containing `"""` cannot be written
//! - NaN and infinite floats cannot be written

// This module contains only documentation; no implementation code

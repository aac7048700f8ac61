//! Error types for KV3 parsing and serialization.
//!
//! Every failure in the crate is reported through the single [`Error`] enum.
//! Parsing is all-or-nothing: the first problem aborts the run and is returned
//! to the caller, there is no partial document.
//!
//! ## Error Categories
//!
//! - **Syntax**: the text does not match the grammar at some position
//! - **Semantic**: the grammar matched but the result is unusable (no body, unknown flag)
//! - **Not implemented**: recognized syntax with no value mapping yet (binary blobs)
//! - **Validation**: a malformed GUID handed to a header constructor, or a value tree
//!   that has no valid text form
//!
//! ## Examples
//!
//! ```rust
//! use serde_kv3::{parse, ErrorCategory};
//!
//! let err = parse("<!-- kv3 broken -->\n{}").unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Syntax);
//! assert!(err.to_string().contains("line 1"));
//! ```

use crate::grammar::Rule;
use std::fmt;
use thiserror::Error;

/// A location in the source text.
///
/// `offset` is a byte offset; `line` and `column` are 1-based and count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Resolves a byte offset into line and column information.
    ///
    /// Offsets past the end of `source` are clamped to its length.
    #[must_use]
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for ch in source[..offset].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Syntax,
    Semantic,
    NotImplemented,
    Validation,
    Io,
    Custom,
}

/// Represents all possible errors that can occur while reading or writing KV3.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The input does not match the grammar.
    #[error("Syntax error at {position}: expected {expected}")]
    Syntax { position: Position, expected: Rule },

    /// The grammar matched a header but no body value followed it.
    #[error("Document contains a header but no value")]
    EmptyDocument,

    /// A flag token does not name a known flag.
    #[error("Unknown flag `{name}` at {position}")]
    UnknownFlag { name: String, position: Position },

    /// Syntax that is recognized but cannot be turned into a value yet.
    #[error("Not implemented: {feature} at {position}")]
    NotImplemented {
        feature: &'static str,
        position: Position,
    },

    /// A version string that is not an 8-4-4-4-12 hexadecimal GUID.
    #[error("Malformed GUID: {0:?}")]
    MalformedGuid(String),

    /// A value tree that has no valid text representation.
    #[error("Invalid value tree: {0}")]
    InvalidTree(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_kv3::{Error, Position, Rule};
    ///
    /// let err = Error::syntax(Position { offset: 4, line: 2, column: 3 }, Rule::Value);
    /// assert_eq!(err.to_string(), "Syntax error at line 2, column 3: expected value");
    /// ```
    pub fn syntax(position: Position, expected: Rule) -> Self {
        Error::Syntax { position, expected }
    }

    /// Creates an unknown-flag error.
    pub fn unknown_flag(name: &str, position: Position) -> Self {
        Error::UnknownFlag {
            name: name.to_string(),
            position,
        }
    }

    /// Creates an error for recognized but unsupported syntax.
    pub fn not_implemented(feature: &'static str, position: Position) -> Self {
        Error::NotImplemented { feature, position }
    }

    /// Creates an error for a value tree the serializer refuses to write.
    pub fn invalid_tree<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidTree(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_kv3::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader or writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the position in the source text, when the error has one.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Syntax { position, .. }
            | Error::UnknownFlag { position, .. }
            | Error::NotImplemented { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Classifies the error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Syntax { .. } => ErrorCategory::Syntax,
            Error::EmptyDocument | Error::UnknownFlag { .. } => ErrorCategory::Semantic,
            Error::NotImplemented { .. } => ErrorCategory::NotImplemented,
            Error::MalformedGuid(_) | Error::InvalidTree(_) => ErrorCategory::Validation,
            Error::Io(_) => ErrorCategory::Io,
            Error::Custom(_) => ErrorCategory::Custom,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_offset() {
        let source = "ab\ncd\nef";
        assert_eq!(
            Position::from_offset(source, 0),
            Position {
                offset: 0,
                line: 1,
                column: 1
            }
        );
        assert_eq!(
            Position::from_offset(source, 4),
            Position {
                offset: 4,
                line: 2,
                column: 2
            }
        );
        assert_eq!(Position::from_offset(source, 100).offset, source.len());
    }

    #[test]
    fn test_categories() {
        assert_eq!(Error::EmptyDocument.category(), ErrorCategory::Semantic);
        assert_eq!(
            Error::unknown_flag("bogus", Position::default()).category(),
            ErrorCategory::Semantic
        );
        assert_eq!(
            Error::MalformedGuid("x".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            Error::invalid_tree("nested flags").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            Error::not_implemented("binary blob", Position::default()).category(),
            ErrorCategory::NotImplemented
        );
    }

    #[test]
    fn test_position_accessor() {
        let pos = Position {
            offset: 3,
            line: 1,
            column: 4,
        };
        assert_eq!(Error::syntax(pos, Rule::Guid).position(), Some(pos));
        assert_eq!(Error::EmptyDocument.position(), None);
    }
}

//! Configuration options for KV3 serialization.
//!
//! The defaults produce canonical form: the default header, floats rounded to
//! six decimal places, and keys quoted only when they are not identifiers.
//!
//! ## Examples
//!
//! ```rust
//! use serde_kv3::{to_string_with_options, Kv3Options};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: f64, y: f64 }
//!
//! let options = Kv3Options::new().with_float_precision(2);
//! let text = to_string_with_options(&Point { x: 1.005, y: 2.0 }, options).unwrap();
//! assert!(text.ends_with("{\n\tx = 1.0\n\ty = 2.0\n}"));
//! ```

use crate::{Header, Result};
use uuid::Uuid;

/// Configuration options for KV3 serialization.
///
/// # Examples
///
/// ```rust
/// use serde_kv3::Kv3Options;
///
/// let options = Kv3Options::new();
/// assert_eq!(options.float_precision, 6);
/// assert!(!options.quote_all_keys);
/// assert_eq!(options.header.format_name(), "generic");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Kv3Options {
    /// Header written in front of the root value.
    pub header: Header,
    /// Decimal places floats are rounded to before printing.
    pub float_precision: usize,
    /// Quote every key, including plain identifiers.
    pub quote_all_keys: bool,
}

impl Default for Kv3Options {
    fn default() -> Self {
        Kv3Options {
            header: Header::default(),
            float_precision: 6,
            quote_all_keys: false,
        }
    }
}

impl Kv3Options {
    /// Creates the default options, which produce canonical form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header to write.
    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    /// Replaces the format identity in the header, keeping the encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTree`](crate::Error::InvalidTree) if `name` is
    /// not an identifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_kv3::Kv3Options;
    /// use uuid::Uuid;
    ///
    /// let options = Kv3Options::new()
    ///     .with_format("vpcf26", Uuid::from_u128(0x26288658_411e_4f14_b698_2e1e5d00dec6))
    ///     .unwrap();
    /// assert_eq!(options.header.format_name(), "vpcf26");
    /// assert_eq!(options.header.encoding_name(), "text");
    /// ```
    pub fn with_format(mut self, name: &str, version: Uuid) -> Result<Self> {
        self.header = self.header.with_format(name, version)?;
        Ok(self)
    }

    /// Sets how many decimal places floats are rounded to.
    ///
    /// Trailing zeros are still trimmed, and at least one fractional digit
    /// is always written.
    #[must_use]
    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = precision;
        self
    }

    /// Writes every key as a quoted string.
    #[must_use]
    pub fn quote_all_keys(mut self) -> Self {
        self.quote_all_keys = true;
        self
    }
}

//! The document header.
//!
//! Every KV3 document starts with a comment line naming the encoding and the
//! format of the body, each with a version GUID:
//!
//! ```text
//! <!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->
//! ```

use crate::grammar::is_identifier;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_ENCODING_NAME: &str = "text";
pub const DEFAULT_ENCODING_VERSION: Uuid = Uuid::from_u128(0xe21c7f3c_8a33_41c5_9977_a76d3a32aa0d);
pub const DEFAULT_FORMAT_NAME: &str = "generic";
pub const DEFAULT_FORMAT_VERSION: Uuid = Uuid::from_u128(0x7412167c_06e9_4698_aff2_e63eb59037e7);

/// Encoding and format identity of a document.
///
/// Headers are immutable once built. Names are plain identifiers and versions
/// are GUIDs, so every header has a text form that parses back to itself.
///
/// # Examples
///
/// ```rust
/// use serde_kv3::Header;
///
/// let header = Header::default();
/// assert_eq!(header.encoding_name(), "text");
/// assert_eq!(header.format_name(), "generic");
///
/// let line = header.to_string();
/// assert_eq!(line.parse::<Header>().unwrap(), header);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    encoding_name: String,
    encoding_version: Uuid,
    format_name: String,
    format_version: Uuid,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            encoding_name: DEFAULT_ENCODING_NAME.to_string(),
            encoding_version: DEFAULT_ENCODING_VERSION,
            format_name: DEFAULT_FORMAT_NAME.to_string(),
            format_version: DEFAULT_FORMAT_VERSION,
        }
    }
}

impl Header {
    /// Creates a header from explicit fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTree`] if a name is not an identifier
    /// (`[A-Za-z0-9_]+`).
    pub fn new(
        encoding_name: &str,
        encoding_version: Uuid,
        format_name: &str,
        format_version: Uuid,
    ) -> Result<Self> {
        for name in [encoding_name, format_name] {
            if !is_identifier(name) {
                return Err(Error::invalid_tree(format!(
                    "header name {:?} is not an identifier",
                    name
                )));
            }
        }
        Ok(Header {
            encoding_name: encoding_name.to_string(),
            encoding_version,
            format_name: format_name.to_string(),
            format_version,
        })
    }

    /// Creates a header from names and GUID strings such as
    /// `"7412167c-06e9-4698-aff2-e63eb59037e7"`. Braces around the GUID are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedGuid`] if a version is not in 8-4-4-4-12 form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_kv3::{Error, Header};
    ///
    /// let header = Header::from_parts(
    ///     "text",
    ///     "e21c7f3c-8a33-41c5-9977-a76d3a32aa0d",
    ///     "vpcf26",
    ///     "{26288658-411e-4f14-b698-2e1e5d00dec6}",
    /// )
    /// .unwrap();
    /// assert_eq!(header.format_name(), "vpcf26");
    ///
    /// let err = Header::from_parts("text", "123-123", "generic", "234-234").unwrap_err();
    /// assert!(matches!(err, Error::MalformedGuid(_)));
    /// ```
    pub fn from_parts(
        encoding_name: &str,
        encoding_version: &str,
        format_name: &str,
        format_version: &str,
    ) -> Result<Self> {
        Header::new(
            encoding_name,
            parse_guid(encoding_version)?,
            format_name,
            parse_guid(format_version)?,
        )
    }

    /// Returns a copy of this header with a different format identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTree`] if `name` is not an identifier.
    pub fn with_format(&self, name: &str, version: Uuid) -> Result<Self> {
        Header::new(&self.encoding_name, self.encoding_version, name, version)
    }

    #[must_use]
    pub fn encoding_name(&self) -> &str {
        &self.encoding_name
    }

    #[must_use]
    pub fn encoding_version(&self) -> Uuid {
        self.encoding_version
    }

    #[must_use]
    pub fn format_name(&self) -> &str {
        &self.format_name
    }

    #[must_use]
    pub fn format_version(&self) -> Uuid {
        self.format_version
    }
}

/// Parses a GUID in 8-4-4-4-12 form, optionally wrapped in braces.
///
/// Hex digits are case-insensitive.
///
/// # Errors
///
/// Returns [`Error::MalformedGuid`] for anything else, including the simple
/// and URN forms `uuid` would otherwise accept.
pub fn parse_guid(text: &str) -> Result<Uuid> {
    let inner = text
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(text);
    if !is_guid_shape(inner) {
        return Err(Error::MalformedGuid(text.to_string()));
    }
    Uuid::parse_str(inner).map_err(|_| Error::MalformedGuid(text.to_string()))
}

pub(crate) fn is_guid_shape(text: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let mut parts = text.split('-');
    for len in GROUPS {
        match parts.next() {
            Some(part) if part.len() == len && part.bytes().all(|b| b.is_ascii_hexdigit()) => {}
            _ => return false,
        }
    }
    parts.next().is_none()
}

impl fmt::Display for Header {
    /// Writes the header line without its trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<!-- kv3 encoding:{}:version{{{}}} format:{}:version{{{}}} -->",
            self.encoding_name,
            self.encoding_version.hyphenated(),
            self.format_name,
            self.format_version.hyphenated()
        )
    }
}

impl FromStr for Header {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::builder::build_header(s)
    }
}

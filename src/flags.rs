//! Value flags.
//!
//! A flagged value carries a semantic tag in front of it, for example a string
//! that names a resource on disk:
//!
//! ```text
//! model = resource:"models/props/crate.vmdl"
//! ```
//!
//! Flags combine, and their text form always lists members in declaration
//! order regardless of how the set was built:
//!
//! ```rust
//! use serde_kv3::Flags;
//!
//! let flags = Flags::RESOURCE_NAME | Flags::RESOURCE;
//! assert_eq!(flags.to_string(), "resource+resourcename");
//! ```

use crate::{Error, Result};
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// The set of flags attached to a [`FlaggedValue`](crate::FlaggedValue).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        const RESOURCE      = 1 << 0;
        const RESOURCE_NAME = 1 << 1;
        const PANORAMA      = 1 << 2;
        const SOUNDEVENT    = 1 << 3;
        const SUBCLASS      = 1 << 4;
    }
}

/// Keywords in declaration order.
const KEYWORDS: [(Flags, &str); 5] = [
    (Flags::RESOURCE, "resource"),
    (Flags::RESOURCE_NAME, "resourcename"),
    (Flags::PANORAMA, "panorama"),
    (Flags::SOUNDEVENT, "soundevent"),
    (Flags::SUBCLASS, "subclass"),
];

impl Flags {
    /// Looks up a single flag by its keyword. Matching ignores ASCII case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_kv3::Flags;
    ///
    /// assert_eq!(Flags::from_keyword("soundevent"), Some(Flags::SOUNDEVENT));
    /// assert_eq!(Flags::from_keyword("Resource"), Some(Flags::RESOURCE));
    /// assert_eq!(Flags::from_keyword("multiline"), None);
    /// ```
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Flags> {
        KEYWORDS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(keyword))
            .map(|(flag, _)| *flag)
    }

    /// Returns the keywords of the members of this set, in declaration order.
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        KEYWORDS
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, keyword) in self.keywords().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(keyword)?;
        }
        Ok(())
    }
}

impl FromStr for Flags {
    type Err = Error;

    /// Parses a `+` separated keyword list. `|` is accepted as a separator too.
    fn from_str(s: &str) -> Result<Self> {
        let mut flags = Flags::empty();
        for keyword in s.split(['+', '|']) {
            let flag = Flags::from_keyword(keyword)
                .ok_or_else(|| Error::unknown_flag(keyword, Default::default()))?;
            flags |= flag;
        }
        Ok(flags)
    }
}

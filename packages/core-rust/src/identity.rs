//! Object identities: the `(category, name)` pair a servant is registered under.
//!
//! # String format
//!
//! An identity renders as `"category/name"`, or just `"name"` when the category
//! is empty. A `/` or `\` inside either part is escaped with a backslash, so
//! parsing the rendered form always yields the original identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies one Ice object hosted by an object adapter.
///
/// Ordering is by category first, then name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    /// Optional grouping, used to select a default servant.
    pub category: String,
    /// Object name. Must not be empty for a registered servant.
    pub name: String,
}

impl Identity {
    /// Creates an identity with an empty category.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            category: String::new(),
            name: name.into(),
        }
    }

    /// Creates an identity with the given category.
    #[must_use]
    pub fn with_category(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }

    /// Returns `true` if the name is empty. Such identities never resolve to a servant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Errors from parsing the string form of an [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityParseError {
    #[error("identity `{0}` has an empty name")]
    EmptyName(String),
    #[error("identity `{0}` contains more than one unescaped `/`")]
    TooManySeparators(String),
    #[error("identity `{0}` ends with a dangling escape")]
    DanglingEscape(String),
}

impl FromStr for Identity {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut category: Option<String> = None;
        let mut current = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err(IdentityParseError::DanglingEscape(s.to_string())),
                },
                '/' if category.is_none() => category = Some(std::mem::take(&mut current)),
                '/' => return Err(IdentityParseError::TooManySeparators(s.to_string())),
                other => current.push(other),
            }
        }

        let identity = Identity {
            category: category.unwrap_or_default(),
            name: current,
        };

        if identity.is_empty() {
            return Err(IdentityParseError::EmptyName(s.to_string()));
        }
        Ok(identity)
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, part: &str) -> fmt::Result {
    for c in part.chars() {
        if c == '/' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.category.is_empty() {
            write_escaped(f, &self.category)?;
            f.write_str("/")?;
        }
        write_escaped(f, &self.name)
    }
}

//! Opaque identifiers from the school information system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque uid or code (`uid`, `courseDcode`, `gradeDcode`, ...).
///
/// The information system emits these as either JSON numbers or strings;
/// the original form is passed through to the solver unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ident {
    Int(i64),
    Text(String),
}

impl Ident {
    /// The empty identifier used by placeholder records.
    pub fn empty() -> Self {
        Ident::Text(String::new())
    }

    /// Whether this is the empty placeholder identifier.
    pub fn is_empty(&self) -> bool {
        matches!(self, Ident::Text(s) if s.is_empty())
    }
}

impl Default for Ident {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ident::Int(n) => write!(f, "{n}"),
            Ident::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Ident {
    fn from(n: i64) -> Self {
        Ident::Int(n)
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Ident::Text(s.to_string())
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Ident::Text(s)
    }
}

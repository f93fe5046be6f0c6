//! Error taxonomy for directive compilation.
//!
//! | Variant | Scope |
//! |---------|-------|
//! | `Structural` | Malformed directory feed. Aborts the run. |
//! | `Lookup` | Unresolvable token or required entity. Aborts one directive. |
//! | `Validation` | Missing field or wrong element count. Aborts one directive. |
//! | `Io` / `Json` / `Config` | Infrastructure. Aborts the run. |
//!
//! Uneven parallel lists are not errors: the affected combinations are
//! skipped and logged (see [`crate::compiler::zip_truncating`]).

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// What kind of token or entity a lookup failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Day-of-week vocabulary.
    Day,
    /// Period number or day-part vocabulary.
    Period,
    /// Class resolved by (grade, class number).
    Class,
    /// Course resolved by subject name.
    Course,
    /// Teacher resolved by name.
    Teacher,
    /// Grade code of a class.
    GradeCode,
}

impl LookupKind {
    /// Short name used in error messages (`"day"`, `"period"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Day => "day",
            LookupKind::Period => "period",
            LookupKind::Class => "class",
            LookupKind::Course => "course",
            LookupKind::Teacher => "teacher",
            LookupKind::GradeCode => "gradeDcode",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crate error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory feed is missing a required section or has the wrong shape.
    #[error("malformed directory feed: {0}")]
    Structural(String),

    /// A token or entity could not be resolved.
    #[error("{kind} '{token}' not found")]
    Lookup { kind: LookupKind, token: String },

    /// A directive does not satisfy its scenario's field requirements.
    #[error("invalid directive: {0}")]
    Validation(String),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates a lookup error.
    pub fn lookup(kind: LookupKind, token: impl Into<String>) -> Self {
        Self::Lookup {
            kind,
            token: token.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error is confined to a single directive.
    ///
    /// Directive-scoped errors are logged at the directive boundary and the
    /// batch continues; everything else aborts the run.
    pub fn is_directive_scoped(&self) -> bool {
        matches!(self, Error::Lookup { .. } | Error::Validation(_))
    }
}
